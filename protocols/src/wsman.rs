//! WS-Management over HTTP, as served by WinRM on port 5985.
//!
//! Only the `Enumerate` operation is spoken, with `OptimizeEnumeration` so
//! that the instances come back in the first response. Replies are read with
//! namespace-agnostic tag matching instead of a full XML parser.

use std::fmt::Write as _;
use std::net::IpAddr;

pub const WSMAN_HTTP_PORT: u16 = 5985;
pub const WSMAN_PATH: &str = "/wsman";
pub const SOAP_CONTENT_TYPE: &str = "application/soap+xml;charset=UTF-8";

const WMI_CIMV2_URI: &str = "http://schemas.microsoft.com/wbem/wsman/1/wmi/root/cimv2";
const ENUMERATE_ACTION: &str = "http://schemas.xmlsoap.org/ws/2004/09/enumeration/Enumerate";
const MAX_ELEMENTS: u32 = 32;

/// WMI classes queried for host inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmiClass {
    OperatingSystem,
    ComputerSystem,
    Processor,
    LogicalDisk,
}

impl WmiClass {
    pub fn name(self) -> &'static str {
        match self {
            Self::OperatingSystem => "Win32_OperatingSystem",
            Self::ComputerSystem => "Win32_ComputerSystem",
            Self::Processor => "Win32_Processor",
            Self::LogicalDisk => "Win32_LogicalDisk",
        }
    }

    pub fn resource_uri(self) -> String {
        format!("{WMI_CIMV2_URI}/{}", self.name())
    }
}

/// `http://<host>:<port>/wsman`, with IPv6 hosts in brackets.
pub fn endpoint_url(addr: IpAddr, port: u16) -> String {
    match addr {
        IpAddr::V4(v4) => format!("http://{v4}:{port}{WSMAN_PATH}"),
        IpAddr::V6(v6) => format!("http://[{v6}]:{port}{WSMAN_PATH}"),
    }
}

/// Builds the SOAP envelope of an optimized `Enumerate` call.
pub fn enumerate_envelope(endpoint: &str, class: WmiClass, message_id: &str, timeout_secs: u64) -> String {
    let mut envelope = String::with_capacity(1536);
    envelope.push_str(concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope""#,
        r#" xmlns:a="http://schemas.xmlsoap.org/ws/2004/08/addressing""#,
        r#" xmlns:n="http://schemas.xmlsoap.org/ws/2004/09/enumeration""#,
        r#" xmlns:w="http://schemas.dmtf.org/wbem/wsman/1/wsman.xsd">"#,
        "<s:Header>"
    ));
    let _ = write!(envelope, "<a:To>{}</a:To>", escape(endpoint));
    let _ = write!(
        envelope,
        r#"<w:ResourceURI s:mustUnderstand="true">{}</w:ResourceURI>"#,
        class.resource_uri()
    );
    envelope.push_str(concat!(
        "<a:ReplyTo><a:Address s:mustUnderstand=\"true\">",
        "http://schemas.xmlsoap.org/ws/2004/08/addressing/role/anonymous",
        "</a:Address></a:ReplyTo>"
    ));
    let _ = write!(envelope, r#"<a:Action s:mustUnderstand="true">{ENUMERATE_ACTION}</a:Action>"#);
    envelope.push_str(r#"<w:MaxEnvelopeSize s:mustUnderstand="true">512000</w:MaxEnvelopeSize>"#);
    let _ = write!(envelope, "<a:MessageID>uuid:{}</a:MessageID>", escape(message_id));
    let _ = write!(envelope, "<w:OperationTimeout>PT{timeout_secs}S</w:OperationTimeout>");
    envelope.push_str("</s:Header><s:Body><n:Enumerate><w:OptimizeEnumeration/>");
    let _ = write!(envelope, "<w:MaxElements>{MAX_ELEMENTS}</w:MaxElements>");
    envelope.push_str("</n:Enumerate></s:Body></s:Envelope>");
    envelope
}

/// Text of a SOAP fault, if the reply is one.
pub fn extract_fault(xml: &str) -> Option<String> {
    let fault = find_element(xml, "Fault")?;
    extract_xml_value(fault, "Message")
        .or_else(|| extract_xml_value(fault, "Text"))
        .or_else(|| Some("unspecified SOAP fault".to_string()))
}

/// Every returned instance of `class`, as raw XML fragments.
pub fn extract_items<'a>(xml: &'a str, class: WmiClass) -> Vec<&'a str> {
    let mut items = Vec::new();
    let mut rest = xml;
    while let Some(item) = find_element(rest, class.name()) {
        items.push(item);
        let consumed = item.as_ptr() as usize - rest.as_ptr() as usize + item.len();
        rest = &rest[consumed..];
    }
    items
}

/// Text content of the first `tag` element, whatever its namespace prefix.
///
/// Empty and `xsi:nil` elements yield `None`.
pub fn extract_xml_value(xml: &str, tag: &str) -> Option<String> {
    let inner = find_element(xml, tag)?;
    let value = decode_entities(inner.trim());
    (!value.is_empty()).then_some(value)
}

/// Inner content of the first non-empty element whose local name is `tag`.
fn find_element<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let mut offset = 0;
    while let Some(found) = xml[offset..].find('<') {
        let start = offset + found;
        let after = &xml[start + 1..];
        offset = start + 1;

        if after.starts_with(['/', '?', '!']) {
            continue;
        }
        let name_end = after.find(|c: char| c.is_whitespace() || c == '>' || c == '/')?;
        let name = &after[..name_end];
        let local = name.rsplit(':').next().unwrap_or(name);
        if local != tag {
            continue;
        }

        let open_end = after.find('>')?;
        if after[..open_end].ends_with('/') {
            continue;
        }
        let content_start = start + 1 + open_end + 1;
        let closing = format!("</{name}>");
        let content_len = xml[content_start..].find(&closing)?;
        return Some(&xml[content_start..content_start + content_len]);
    }
    None
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
