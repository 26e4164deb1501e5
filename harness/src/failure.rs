/*
   This file is part of bltools.

   bltools is a collection of build and CI helpers for the baselib tree.

   bltools is free software: you can redistribute it and/or modify
   it under the terms of the GNU General Public License as published by
   the Free Software Foundation, either version 3 of the License, or
   (at your option) any later version.

   bltools is distributed in the hope that it will be useful,
   but WITHOUT ANY WARRANTY; without even the implied warranty of
   MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
   GNU General Public License for more details.

   You should have received a copy of the GNU General Public License
   along with bltools.  If not, see <https://www.gnu.org/licenses/>.
*/

use lazy_static::lazy_static;
use regex::bytes::Regex;

/// Lines the wrapped tool tags for its own debugging are never failures.
const DEBUG_PREFIX: &[u8] = b"DEBUG:";

pub fn is_failure_line(line: &[u8]) -> bool {
    lazy_static! {
        // Plain substring markers, case-sensitive, no word boundaries.
        static ref RE: Regex = Regex::new(r": (fatal|error|warn)|(fatal|error):").unwrap();
    }

    !line.starts_with(DEBUG_PREFIX) && RE.is_match(line)
}

/// Frames `line` for stderr; the line's own bytes are kept as they are.
pub fn failure_report(test_name: &str, line: &[u8]) -> Vec<u8> {
    let mut result = format!("\n######### Failure in {} #########\n ", test_name).into_bytes();
    result.extend_from_slice(line);
    result.extend_from_slice(
        b" \n\nPlease see full error details in the log file (search for the test name)\n\n",
    );
    result
}
