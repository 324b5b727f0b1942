//! Introspection scheme printed for the host framework.

use crate::event::xml::escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    String,
    Number,
}

impl DataType {
    fn as_str(self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
        }
    }
}

/// One configurable argument of the input.
#[derive(Debug, Clone)]
pub struct Argument {
    pub name: &'static str,
    pub title: &'static str,
    pub data_type: DataType,
    pub required_on_create: bool,
    pub required_on_edit: bool,
}

#[derive(Debug, Clone)]
pub struct Scheme {
    pub title: &'static str,
    pub description: &'static str,
    pub use_external_validation: bool,
    pub use_single_instance: bool,
    pub arguments: Vec<Argument>,
}

impl Scheme {
    /// Scheme of the websites input.
    pub fn websites() -> Self {
        Self {
            title: "Logic Monitor Website Response Metrics",
            description: "Pull website response time metrics",
            use_external_validation: false,
            use_single_instance: false,
            arguments: vec![
                Argument {
                    name: "org",
                    title: "Organisation Subdomain",
                    data_type: DataType::String,
                    required_on_create: true,
                    required_on_edit: false,
                },
                Argument {
                    name: "token",
                    title: "Bearer Token",
                    data_type: DataType::String,
                    required_on_create: true,
                    required_on_edit: false,
                },
                Argument {
                    name: "history",
                    title: "Days of historical data",
                    data_type: DataType::Number,
                    required_on_create: false,
                    required_on_edit: false,
                },
            ],
        }
    }

    /// Render the scheme document.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<scheme>");
        xml.push_str(&format!("<title>{}</title>", escape(self.title)));
        xml.push_str(&format!(
            "<description>{}</description>",
            escape(self.description)
        ));
        xml.push_str(&format!(
            "<use_external_validation>{}</use_external_validation>",
            self.use_external_validation
        ));
        xml.push_str("<streaming_mode>xml</streaming_mode>");
        xml.push_str(&format!(
            "<use_single_instance>{}</use_single_instance>",
            self.use_single_instance
        ));

        xml.push_str("<endpoint><args>");
        for arg in &self.arguments {
            xml.push_str(&format!("<arg name=\"{}\">", escape(arg.name)));
            xml.push_str(&format!("<title>{}</title>", escape(arg.title)));
            xml.push_str(&format!("<data_type>{}</data_type>", arg.data_type.as_str()));
            xml.push_str(&format!(
                "<required_on_create>{}</required_on_create>",
                arg.required_on_create
            ));
            xml.push_str(&format!(
                "<required_on_edit>{}</required_on_edit>",
                arg.required_on_edit
            ));
            xml.push_str("</arg>");
        }
        xml.push_str("</args></endpoint></scheme>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websites_scheme() {
        let xml = Scheme::websites().to_xml();

        assert!(xml.starts_with("<scheme><title>Logic Monitor Website Response Metrics</title>"));
        assert!(xml.contains("<streaming_mode>xml</streaming_mode>"));
        assert!(xml.contains("<use_external_validation>false</use_external_validation>"));
        assert!(xml.contains(
            "<arg name=\"history\"><title>Days of historical data</title>\
             <data_type>number</data_type><required_on_create>false</required_on_create>"
        ));
        assert_eq!(xml.matches("<arg ").count(), 3);
        assert!(xml.ends_with("</args></endpoint></scheme>"));
    }
}
