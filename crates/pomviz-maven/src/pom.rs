//! POM file parsing into a fixed record: coordinates, parent reference,
//! properties, dependency management, and direct dependencies.

use std::collections::BTreeMap;

use pomviz_core::coordinate::PackageCoordinate;
use pomviz_util::errors::PomvizError;
use quick_xml::events::Event;
use quick_xml::Reader;

const DEPENDENCY: &str = "project>dependencies>dependency";
const MANAGED_DEPENDENCY: &str = "project>dependencyManagement>dependencies>dependency";

/// A parsed POM (Project Object Model) file.
///
/// Section fields are `Option` so that a missing section (`None`) differs from
/// a section that is present but empty (`Some` of an empty collection).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,

    pub parent: Option<ParentRef>,
    pub properties: Option<BTreeMap<String, String>>,
    pub dependency_management: Option<Vec<PomDependency>>,
    pub dependencies: Option<Vec<PomDependency>>,
}

/// Reference to a parent POM.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParentRef {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

/// A dependency declared in a POM file, exactly as written (no interpolation).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PomDependency {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: Option<String>,
    pub type_: Option<String>,
}

impl ParentRef {
    /// Coordinates of the parent, if all three parts were declared.
    pub fn coordinate(&self) -> Option<PackageCoordinate> {
        Some(PackageCoordinate::new(
            self.group_id.as_deref()?,
            self.artifact_id.as_deref()?,
            self.version.as_deref()?,
        ))
    }
}

impl PomDependency {
    /// Whether this is a BOM import (`scope = "import"`, `type = "pom"`).
    ///
    /// Only meaningful inside dependency management.
    pub fn is_bom_import(&self) -> bool {
        self.scope.as_deref() == Some("import") && self.type_.as_deref() == Some("pom")
    }
}

impl Pom {
    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().and_then(|p| p.group_id.as_deref()))
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().and_then(|p| p.version.as_deref()))
    }

    /// Built-in `project.*` (and legacy `pom.*`) variables for this POM.
    pub fn builtin_properties(&self) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();
        let mut put = |names: &[&str], value: Option<&str>| {
            if let Some(v) = value {
                for name in names {
                    props.insert((*name).to_string(), v.to_string());
                }
            }
        };
        put(
            &["project.groupId", "pom.groupId"],
            self.effective_group_id(),
        );
        put(
            &["project.artifactId", "pom.artifactId"],
            self.artifact_id.as_deref(),
        );
        put(&["project.version", "pom.version"], self.effective_version());
        put(
            &["project.packaging", "pom.packaging"],
            self.packaging.as_deref(),
        );
        if let Some(parent) = &self.parent {
            put(&["project.parent.groupId"], parent.group_id.as_deref());
            put(&["project.parent.artifactId"], parent.artifact_id.as_deref());
            put(&["project.parent.version"], parent.version.as_deref());
        }
        props
    }

    /// Own `<properties>` entries (empty when the section is absent).
    pub fn own_properties(&self) -> impl Iterator<Item = (&String, &String)> {
        self.properties.iter().flatten()
    }

    /// Own `<dependencyManagement>` entries (empty when the section is absent).
    pub fn managed_dependencies(&self) -> &[PomDependency] {
        self.dependency_management.as_deref().unwrap_or_default()
    }

    /// Own direct `<dependencies>` (empty when the section is absent).
    pub fn direct_dependencies(&self) -> &[PomDependency] {
        self.dependencies.as_deref().unwrap_or_default()
    }
}

/// Parse POM XML bytes into a [`Pom`].
///
/// Extraction is best effort: unknown elements are ignored and missing fields
/// stay `None`. Only markup that is not well-formed (or has no root element)
/// is an error.
pub fn parse_pom(bytes: &[u8]) -> Result<Pom, PomvizError> {
    let xml = String::from_utf8_lossy(bytes);
    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut state = PomBuilder::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                state.open(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Empty(ref e)) => {
                state.open(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                state.close();
            }
            Ok(Event::End(_)) => state.close(),
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().map_err(|err| parse_error(&reader, err))?;
                state.text.push_str(&text);
            }
            Ok(Event::CData(e)) => {
                state.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_error(&reader, e)),
            _ => {}
        }
    }

    if let Some(open) = state.path.last() {
        return Err(PomvizError::Parse {
            message: format!("unexpected end of document inside <{open}>"),
        });
    }
    if !state.saw_root {
        return Err(PomvizError::Parse {
            message: "document has no root element".to_string(),
        });
    }
    Ok(state.pom)
}

fn parse_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> PomvizError {
    PomvizError::Parse {
        message: format!("at byte {}: {err}", reader.buffer_position()),
    }
}

/// Accumulates a [`Pom`] while walking XML events.
#[derive(Default)]
struct PomBuilder {
    pom: Pom,
    path: Vec<String>,
    text: String,
    dep: Option<PomDependency>,
    parent: Option<ParentRef>,
    saw_root: bool,
}

impl PomBuilder {
    fn open(&mut self, tag: String) {
        self.saw_root = true;
        self.path.push(tag);
        self.text.clear();

        match self.context().as_str() {
            "project>properties" => {
                self.pom.properties.get_or_insert_with(BTreeMap::new);
            }
            "project>dependencies" => {
                self.pom.dependencies.get_or_insert_with(Vec::new);
            }
            "project>dependencyManagement>dependencies" => {
                self.pom.dependency_management.get_or_insert_with(Vec::new);
            }
            DEPENDENCY | MANAGED_DEPENDENCY => self.dep = Some(PomDependency::default()),
            "project>parent" => self.parent = Some(ParentRef::default()),
            _ => {}
        }
    }

    fn close(&mut self) {
        let ctx = self.context();
        let text = std::mem::take(&mut self.text);
        let value = non_empty(&text);

        // <project><properties><name>value</name></properties>
        if self.path.len() == 3 && ctx.starts_with("project>properties>") {
            if let (Some(props), Some(name)) = (self.pom.properties.as_mut(), self.path.last()) {
                props.insert(name.clone(), text.trim().to_string());
            }
        }

        if let Some(dep) = self.dep.as_mut() {
            let field = ctx
                .strip_prefix(DEPENDENCY)
                .or_else(|| ctx.strip_prefix(MANAGED_DEPENDENCY))
                .and_then(|rest| rest.strip_prefix('>'));
            match field {
                Some("groupId") => dep.group_id = value.clone(),
                Some("artifactId") => dep.artifact_id = value.clone(),
                Some("version") => dep.version = value.clone(),
                Some("scope") => dep.scope = value.clone(),
                Some("optional") => dep.optional = value.clone(),
                Some("type") => dep.type_ = value.clone(),
                _ => {}
            }
        }
        match ctx.as_str() {
            DEPENDENCY => {
                if let (Some(dep), Some(list)) = (self.dep.take(), self.pom.dependencies.as_mut()) {
                    list.push(dep);
                }
            }
            MANAGED_DEPENDENCY => {
                if let (Some(dep), Some(list)) =
                    (self.dep.take(), self.pom.dependency_management.as_mut())
                {
                    list.push(dep);
                }
            }
            _ => {}
        }

        if let Some(parent) = self.parent.as_mut() {
            match ctx.as_str() {
                "project>parent>groupId" => parent.group_id = value.clone(),
                "project>parent>artifactId" => parent.artifact_id = value.clone(),
                "project>parent>version" => parent.version = value.clone(),
                _ => {}
            }
        }
        if ctx == "project>parent" {
            self.pom.parent = self.parent.take();
        }

        if self.path.len() == 2 && self.path[0] == "project" {
            match self.path[1].as_str() {
                "groupId" => self.pom.group_id = value,
                "artifactId" => self.pom.artifact_id = value,
                "version" => self.pom.version = value,
                "packaging" => self.pom.packaging = value,
                _ => {}
            }
        }

        self.path.pop();
    }

    /// Build a context string from the current XML path for matching.
    fn context(&self) -> String {
        self.path.join(">")
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>org.example</groupId>
    <artifactId>my-lib</artifactId>
    <version>1.0.0</version>
    <packaging>jar</packaging>

    <properties>
        <kotlin.version>2.3.0</kotlin.version>
        <empty.prop/>
    </properties>

    <dependencies>
        <dependency>
            <groupId>org.jetbrains.kotlin</groupId>
            <artifactId>kotlin-stdlib</artifactId>
            <version>${kotlin.version}</version>
        </dependency>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <version>4.13.2</version>
            <scope>test</scope>
            <optional>false</optional>
        </dependency>
    </dependencies>
</project>"#;

    #[test]
    fn parse_simple_pom() {
        let pom = parse_pom(SIMPLE_POM.as_bytes()).unwrap();
        assert_eq!(pom.group_id.as_deref(), Some("org.example"));
        assert_eq!(pom.artifact_id.as_deref(), Some("my-lib"));
        assert_eq!(pom.version.as_deref(), Some("1.0.0"));
        assert_eq!(pom.packaging.as_deref(), Some("jar"));
        assert_eq!(pom.direct_dependencies().len(), 2);
        let props = pom.properties.as_ref().unwrap();
        assert_eq!(props.get("kotlin.version").unwrap(), "2.3.0");
        assert_eq!(props.get("empty.prop").unwrap(), "");
    }

    #[test]
    fn raw_fields_are_not_interpolated() {
        let pom = parse_pom(SIMPLE_POM.as_bytes()).unwrap();
        let deps = pom.direct_dependencies();
        assert_eq!(deps[0].version.as_deref(), Some("${kotlin.version}"));
        assert_eq!(deps[0].scope, None);
        assert_eq!(deps[1].scope.as_deref(), Some("test"));
        assert_eq!(deps[1].optional.as_deref(), Some("false"));
    }

    #[test]
    fn absent_sections_differ_from_empty_ones() {
        let xml = r#"<project>
    <artifactId>bare</artifactId>
    <dependencies/>
</project>"#;
        let pom = parse_pom(xml.as_bytes()).unwrap();
        assert_eq!(pom.properties, None);
        assert_eq!(pom.dependency_management, None);
        assert_eq!(pom.dependencies, Some(Vec::new()));
    }

    #[test]
    fn dependency_management_and_bom() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>1.0.0</version>

    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>org.jetbrains.kotlinx</groupId>
                <artifactId>kotlinx-coroutines-bom</artifactId>
                <version>1.8.0</version>
                <type>pom</type>
                <scope>import</scope>
            </dependency>
            <dependency>
                <groupId>com.google.guava</groupId>
                <artifactId>guava</artifactId>
                <version>32.0.0-jre</version>
            </dependency>
        </dependencies>
    </dependencyManagement>
</project>"#;
        let pom = parse_pom(xml.as_bytes()).unwrap();
        let managed = pom.managed_dependencies();
        assert_eq!(managed.len(), 2);
        assert!(managed[0].is_bom_import());
        assert!(!managed[1].is_bom_import());
        // Managed entries never leak into the direct dependency list.
        assert_eq!(pom.dependencies, None);
    }

    #[test]
    fn parent_ref_parsing() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <parent>
        <groupId>org.example</groupId>
        <artifactId>parent-pom</artifactId>
        <version>2.0.0</version>
        <relativePath/>
    </parent>
    <artifactId>child</artifactId>
</project>"#;
        let pom = parse_pom(xml.as_bytes()).unwrap();
        assert_eq!(pom.effective_group_id(), Some("org.example"));
        assert_eq!(pom.effective_version(), Some("2.0.0"));
        let parent = pom.parent.as_ref().unwrap().coordinate().unwrap();
        assert_eq!(parent.key(), "org.example:parent-pom:2.0.0");
    }

    #[test]
    fn incomplete_parent_has_no_coordinate() {
        let xml = r#"<project><parent><groupId>g</groupId></parent></project>"#;
        let pom = parse_pom(xml.as_bytes()).unwrap();
        assert!(pom.parent.unwrap().coordinate().is_none());
    }

    #[test]
    fn exclusion_fields_do_not_overwrite_dependency() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <dependencies>
        <dependency>
            <groupId>com.example</groupId>
            <artifactId>lib</artifactId>
            <version>1.0</version>
            <exclusions>
                <exclusion>
                    <groupId>commons-logging</groupId>
                    <artifactId>commons-logging</artifactId>
                </exclusion>
            </exclusions>
        </dependency>
    </dependencies>
</project>"#;
        let pom = parse_pom(xml.as_bytes()).unwrap();
        let dep = &pom.direct_dependencies()[0];
        assert_eq!(dep.group_id.as_deref(), Some("com.example"));
        assert_eq!(dep.artifact_id.as_deref(), Some("lib"));
    }

    #[test]
    fn nested_dependencies_are_ignored() {
        let xml = r#"<project>
    <build>
        <plugins>
            <plugin>
                <dependencies>
                    <dependency>
                        <groupId>plugin.dep</groupId>
                        <artifactId>x</artifactId>
                        <version>1</version>
                    </dependency>
                </dependencies>
            </plugin>
        </plugins>
    </build>
    <profiles>
        <profile>
            <dependencies>
                <dependency>
                    <groupId>profile.dep</groupId>
                    <artifactId>y</artifactId>
                    <version>1</version>
                </dependency>
            </dependencies>
        </profile>
    </profiles>
</project>"#;
        let pom = parse_pom(xml.as_bytes()).unwrap();
        assert_eq!(pom.dependencies, None);
    }

    #[test]
    fn builtin_properties_fall_back_to_parent() {
        let xml = r#"<project>
    <parent>
        <groupId>org.example</groupId>
        <artifactId>parent-pom</artifactId>
        <version>2.0.0</version>
    </parent>
    <artifactId>child</artifactId>
</project>"#;
        let pom = parse_pom(xml.as_bytes()).unwrap();
        let props = pom.builtin_properties();
        assert_eq!(props.get("project.groupId").unwrap(), "org.example");
        assert_eq!(props.get("pom.version").unwrap(), "2.0.0");
        assert_eq!(props.get("project.artifactId").unwrap(), "child");
        assert_eq!(props.get("project.parent.artifactId").unwrap(), "parent-pom");
        assert!(!props.contains_key("project.packaging"));
    }

    #[test]
    fn escaped_text_and_cdata() {
        let xml = r#"<project>
    <properties>
        <a>x &amp; y</a>
        <b><![CDATA[1.0]]></b>
    </properties>
</project>"#;
        let pom = parse_pom(xml.as_bytes()).unwrap();
        let props = pom.properties.unwrap();
        assert_eq!(props.get("a").unwrap(), "x & y");
        assert_eq!(props.get("b").unwrap(), "1.0");
    }

    #[test]
    fn malformed_xml_is_parse_error() {
        let err = parse_pom(b"<project><groupId>g</artifactId></project>").unwrap_err();
        assert!(matches!(err, PomvizError::Parse { .. }));
    }

    #[test]
    fn truncated_xml_is_parse_error() {
        let err = parse_pom(b"<project><dependencies>").unwrap_err();
        assert!(matches!(err, PomvizError::Parse { .. }));
    }

    #[test]
    fn empty_document_is_parse_error() {
        assert!(parse_pom(b"").is_err());
        assert!(parse_pom(b"<?xml version=\"1.0\"?>").is_err());
    }
}
