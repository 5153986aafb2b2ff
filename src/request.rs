use crate::builds::BuildType;
use anyhow::Result;
use indexmap::IndexMap;
use quick_xml::{events::BytesText, Writer};
use std::io;

const COMMENT: &str = "Triggered from CLI";

/// A single build to be queued on TeamCity
///
/// The `remote` and `branch` properties are always present and always come first. Any other
/// properties follow in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    build_type: BuildType,
    personal: bool,
    branch: String,
    remote: String,
    properties: IndexMap<String, String>,
}

impl BuildRequest {
    pub fn new(build_type: BuildType, personal: bool, branch: &str, remote: &str) -> Self {
        let mut properties = IndexMap::with_capacity(5);
        properties.insert("remote".to_owned(), remote.to_owned());
        properties.insert("branch".to_owned(), branch.to_owned());
        Self {
            build_type,
            personal,
            branch: branch.to_owned(),
            remote: remote.to_owned(),
            properties,
        }
    }

    /// Add a build property. Setting an existing name replaces its value but keeps its position.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn build_type(&self) -> BuildType {
        self.build_type
    }

    pub fn personal(&self) -> bool {
        self.personal
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    /// Render the request body expected by TeamCity's `buildQueue` endpoint
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .create_element("build")
            .with_attribute(("personal", if self.personal { "true" } else { "false" }))
            .with_attribute(("branchName", self.branch.as_str()))
            .write_inner_content(|w| -> io::Result<()> {
                w.create_element("buildType")
                    .with_attribute(("id", self.build_type.id()))
                    .write_empty()?;
                w.create_element("comment")
                    .write_inner_content(|w| -> io::Result<()> {
                        w.create_element("text")
                            .write_text_content(BytesText::new(COMMENT))?;
                        Ok(())
                    })?;
                w.create_element("properties")
                    .write_inner_content(|w| -> io::Result<()> {
                        for (name, value) in &self.properties {
                            w.create_element("property")
                                .with_attribute(("name", name.as_str()))
                                .with_attribute(("value", value.as_str()))
                                .write_empty()?;
                        }
                        Ok(())
                    })?;
                Ok(())
            })?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_properties(xml: &str) -> usize {
        xml.matches("<property ").count()
    }

    #[test]
    fn personal_flag_is_lower_case() {
        let xml = BuildRequest::new(BuildType::Har, true, "main", "origin")
            .to_xml()
            .unwrap();
        assert!(xml.contains(r#"personal="true""#));

        let xml = BuildRequest::new(BuildType::Har, false, "main", "origin")
            .to_xml()
            .unwrap();
        assert!(xml.contains(r#"personal="false""#));
        assert!(!xml.contains("False"));
    }

    #[test]
    fn document_layout() {
        let xml = BuildRequest::new(BuildType::Linux, false, "3.5-fix", "upstream")
            .to_xml()
            .unwrap();
        assert!(xml.trim_start().starts_with("<build "));
        assert!(xml.contains(r#"branchName="3.5-fix""#));
        assert!(xml.contains(r#"<buildType id="JonasHaRequests_Neo4jCustom""#));
        assert!(xml.contains("<comment>"));
        assert!(xml.contains("Triggered from CLI"));
        assert!(xml.contains(r#"name="remote" value="upstream""#));
        assert!(xml.contains(r#"name="branch" value="3.5-fix""#));
        assert!(xml.trim_end().ends_with("</build>"));
    }

    #[test]
    fn properties_keep_insertion_order() {
        let xml = BuildRequest::new(BuildType::Har, false, "main", "origin")
            .with_property("zeta", "1")
            .with_property("alpha", "2")
            .with_property("mid", "3")
            .to_xml()
            .unwrap();
        assert_eq!(count_properties(&xml), 5);

        let positions: Vec<usize> = ["remote", "branch", "zeta", "alpha", "mid"]
            .iter()
            .map(|name| xml.find(&format!(r#"name="{}""#, name)).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn repeated_property_replaces_value_in_place() {
        let request = BuildRequest::new(BuildType::Har, false, "main", "origin")
            .with_property("a", "1")
            .with_property("b", "2")
            .with_property("a", "3");
        let names: Vec<&str> = request.properties().keys().map(String::as_str).collect();
        assert_eq!(names, ["remote", "branch", "a", "b"]);
        assert_eq!(request.properties()["a"], "3");
        assert_eq!(count_properties(&request.to_xml().unwrap()), 4);
    }

    #[test]
    fn special_characters_are_escaped() {
        let xml = BuildRequest::new(BuildType::Har, false, "pr/1234&foo", "git@host:\"x\"<y>")
            .with_property("note", "a < b")
            .to_xml()
            .unwrap();
        assert!(xml.contains(r#"branchName="pr/1234&amp;foo""#));
        assert!(xml.contains(r#"value="pr/1234&amp;foo""#));
        assert!(xml.contains("git@host:&quot;x&quot;&lt;y&gt;"));
        assert!(xml.contains(r#"value="a &lt; b""#));
        assert!(!xml.contains("pr/1234&foo"));
    }
}
