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

use itertools::Itertools;

use util::substitute;

const PROJECT_NAME: &str = "@projectName@";
const TOP_LEVEL_DIR: &str = "@topLevelDir@";
const BUILD_SETTINGS_AND_TARGET: &str = "@buildSettingsAndTarget@";

const INSERT_LINKED_RESOURCES: &str = "@insertLinkedResources";
const INSERT_REFERENCES: &str = "@insertReferences";
const INSERT_EXTERNAL_INCLUDES: &str = "@insertExternalIncludes";

const INDENT: &str = "    ";

/// Everything a template needs to know about one project in one build
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    /// Last component of the project path; also the make target.
    pub name: String,
    pub source_root: String,
    /// Build variables followed by the make target.
    pub build_settings: String,
    /// Linked resources, relative to the source root.
    pub resources: Vec<String>,
    pub includes: Vec<String>,
}

impl ProjectContext {
    /// Renders `template` line by line. Every output line ends with `\n`.
    pub fn render(&self, template: &str) -> String {
        let replacements = [
            (PROJECT_NAME, self.name.as_str()),
            (TOP_LEVEL_DIR, self.source_root.as_str()),
            (BUILD_SETTINGS_AND_TARGET, self.build_settings.as_str()),
        ];

        let mut result = String::with_capacity(template.len());
        for line in template.lines() {
            let block = if line.contains(INSERT_LINKED_RESOURCES) {
                self.linked_resources()
            } else if line.contains(INSERT_REFERENCES) {
                self.references()
            } else if line.contains(INSERT_EXTERNAL_INCLUDES) {
                self.external_includes()
            } else {
                vec![substitute(line, &replacements)]
            };

            for line in block {
                result.push_str(&line);
                result.push('\n');
            }
        }

        result
    }

    fn linked_resources(&self) -> Vec<String> {
        self.resources
            .iter()
            .map(|resource| {
                [
                    format!("{}<link>", indent(2)),
                    format!("{}<name>{}</name>", indent(3), resource_name(resource)),
                    format!("{}<type>2</type>", indent(3)),
                    format!(
                        "{}<location>{}/{}</location>",
                        indent(3),
                        self.source_root.trim_end_matches('/'),
                        resource
                    ),
                    format!("{}</link>", indent(2)),
                ]
                .iter()
                .join("\n")
            })
            .collect()
    }

    fn references(&self) -> Vec<String> {
        self.resources
            .iter()
            .map(|resource| {
                format!(
                    "{}<entry flags=\"VALUE_WORKSPACE_PATH|RESOLVED\" kind=\"sourcePath\" name=\"{}\"/>",
                    indent(6),
                    resource_name(resource)
                )
            })
            .collect()
    }

    fn external_includes(&self) -> Vec<String> {
        self.includes
            .iter()
            .map(|include| {
                format!(
                    "{}<listOptionValue builtIn=\"false\" value=\"&quot;{}&quot;\"/>",
                    indent(9),
                    include
                )
            })
            .collect()
    }
}

/// Eclipse resource names cannot contain slashes.
pub fn resource_name(resource: &str) -> String {
    format!("{}-ref", resource.replace('/', "-"))
}

fn indent(level: usize) -> String {
    INDENT.repeat(level)
}

pub const PROJECT_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<projectDescription>
    <name>@projectName@</name>
    <comment></comment>
    <projects>
    </projects>
    <buildSpec>
        <buildCommand>
            <name>org.eclipse.cdt.managedbuilder.core.genmakebuilder</name>
            <triggers>full,incremental,</triggers>
            <arguments>
            </arguments>
        </buildCommand>
        <buildCommand>
            <name>org.eclipse.cdt.managedbuilder.core.ScannerConfigBuilder</name>
            <triggers>full,incremental,</triggers>
            <arguments>
            </arguments>
        </buildCommand>
    </buildSpec>
    <natures>
        <nature>org.eclipse.cdt.core.cnature</nature>
        <nature>org.eclipse.cdt.core.ccnature</nature>
        <nature>org.eclipse.cdt.managedbuilder.core.managedBuildNature</nature>
        <nature>org.eclipse.cdt.managedbuilder.core.ScannerConfigNature</nature>
    </natures>
    <linkedResources>
        @insertLinkedResources@
    </linkedResources>
</projectDescription>"#;

pub const CPROJECT_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<?fileVersion 4.0.0?>

<cproject storage_type_id="org.eclipse.cdt.core.XmlProjectDescriptionStorage">
    <storageModule moduleId="org.eclipse.cdt.core.settings">
        <cconfiguration id="cdt.managedbuild.toolchain.gnu.base.1418557620">
            <storageModule buildSystemId="org.eclipse.cdt.managedbuilder.core.configurationDataProvider" id="cdt.managedbuild.toolchain.gnu.base.1418557620" moduleId="org.eclipse.cdt.core.settings" name="Default">
                <externalSettings/>
                <extensions>
                    <extension id="org.eclipse.cdt.core.ELF" point="org.eclipse.cdt.core.BinaryParser"/>
                    <extension id="org.eclipse.cdt.core.GmakeErrorParser" point="org.eclipse.cdt.core.ErrorParser"/>
                    <extension id="org.eclipse.cdt.core.CWDLocator" point="org.eclipse.cdt.core.ErrorParser"/>
                    <extension id="org.eclipse.cdt.core.GCCErrorParser" point="org.eclipse.cdt.core.ErrorParser"/>
                    <extension id="org.eclipse.cdt.core.GASErrorParser" point="org.eclipse.cdt.core.ErrorParser"/>
                    <extension id="org.eclipse.cdt.core.GLDErrorParser" point="org.eclipse.cdt.core.ErrorParser"/>
                    <extension id="org.eclipse.cdt.core.VCErrorParser" point="org.eclipse.cdt.core.ErrorParser"/>
                </extensions>
            </storageModule>
            <storageModule moduleId="cdtBuildSystem" version="4.0.0">
                <configuration buildProperties="" description="" id="cdt.managedbuild.toolchain.gnu.base.1418557620" artifactName="@projectName@" errorParsers="org.eclipse.cdt.core.GmakeErrorParser;org.eclipse.cdt.core.CWDLocator;org.eclipse.cdt.core.GCCErrorParser;org.eclipse.cdt.core.GASErrorParser;org.eclipse.cdt.core.GLDErrorParser;org.eclipse.cdt.core.VCErrorParser" name="Default" parent="org.eclipse.cdt.build.core.emptycfg">
                    <folderInfo id="cdt.managedbuild.toolchain.gnu.base.1418557620.1099587585" name="/" resourcePath="">
                        <toolChain id="cdt.managedbuild.toolchain.gnu.base.755120562" name="cdt.managedbuild.toolchain.gnu.base" superClass="cdt.managedbuild.toolchain.gnu.base">
                            <targetPlatform archList="all" binaryParser="org.eclipse.cdt.core.ELF" id="cdt.managedbuild.target.gnu.platform.base.127772109" name="Debug Platform" osList="all" superClass="cdt.managedbuild.target.gnu.platform.base"/>
                            <builder arguments="@buildSettingsAndTarget@" buildPath="@topLevelDir@" command="make" enableCleanBuild="false" id="cdt.managedbuild.target.gnu.builder.base.1047112421" incrementalBuildTarget="" keepEnvironmentInBuildfile="false" managedBuildOn="false" name="Gnu Make Builder" parallelBuildOn="true" parallelizationNumber="optimal" superClass="cdt.managedbuild.target.gnu.builder.base"/>
                            <tool id="cdt.managedbuild.tool.gnu.cpp.compiler.base.1986614653" name="GCC C++ Compiler" superClass="cdt.managedbuild.tool.gnu.cpp.compiler.base">
                                <option id="gnu.cpp.compiler.option.include.paths.710363963" superClass="gnu.cpp.compiler.option.include.paths" valueType="includePath">
                                    @insertExternalIncludes@
                                </option>
                                <inputType id="cdt.managedbuild.tool.gnu.cpp.compiler.input.1504746194" superClass="cdt.managedbuild.tool.gnu.cpp.compiler.input"/>
                            </tool>
                        </toolChain>
                    </folderInfo>
                    <sourceEntries>
                        @insertReferences@
                    </sourceEntries>
                </configuration>
            </storageModule>
            <storageModule moduleId="org.eclipse.cdt.core.externalSettings"/>
        </cconfiguration>
    </storageModule>
    <storageModule moduleId="scannerConfiguration">
        <autodiscovery enabled="true" problemReportingEnabled="true" selectedProfileId=""/>
        <scannerConfigBuildInfo instanceId="cdt.managedbuild.toolchain.gnu.base.1418557620;cdt.managedbuild.toolchain.gnu.base.1418557620.1099587585;cdt.managedbuild.tool.gnu.cpp.compiler.base.815294144;cdt.managedbuild.tool.gnu.cpp.compiler.input.1991193760">
            <autodiscovery enabled="true" problemReportingEnabled="true" selectedProfileId=""/>
        </scannerConfigBuildInfo>
        <scannerConfigBuildInfo instanceId="cdt.managedbuild.toolchain.gnu.base.1418557620;cdt.managedbuild.toolchain.gnu.base.1418557620.1099587585;cdt.managedbuild.tool.gnu.c.compiler.base.1259566155;cdt.managedbuild.tool.gnu.c.compiler.input.1501200454">
            <autodiscovery enabled="true" problemReportingEnabled="true" selectedProfileId=""/>
        </scannerConfigBuildInfo>
    </storageModule>
    <storageModule moduleId="org.eclipse.cdt.core.LanguageSettingsProviders"/>
</cproject>"#;
