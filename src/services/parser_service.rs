use std::io::{Cursor, Read};
use std::sync::Arc;

use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::services::docai_service::OcrBackend;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const SUPPORTED_MEDIA_TYPES: &[&str] = &[PDF_MIME, DOCX_MIME];

/// Structured fields pulled from one resume. Every field defaults to an empty
/// string when the heuristic finds nothing; absence is never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResumeFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub skills: String,
    pub education: String,
    pub experience: String,
    pub raw_text: String,
}

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d\s().\-]{8,18}\d").unwrap());
static UPPER_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z\s]{4,}$").unwrap());
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(EXPERIENCE|EDUCATION|SKILLS)\b").unwrap());
static EXPERIENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\d+\+?\s+years?").unwrap());

#[derive(Clone)]
pub struct ResumeParser {
    ocr: Arc<dyn OcrBackend>,
}

impl ResumeParser {
    pub fn new(ocr: Arc<dyn OcrBackend>) -> Self {
        Self { ocr }
    }

    /// Extracts structured fields from a resume binary. Fails only on an
    /// empty buffer, an unsupported media type, or a hard backend error;
    /// individual missing fields come back empty.
    pub async fn parse(&self, data: &[u8], media_type: &str) -> Result<ParsedResumeFields> {
        if data.is_empty() {
            return Err(Error::MissingFile);
        }

        let text = match media_type {
            PDF_MIME => self.ocr.process(data, media_type).await?,
            DOCX_MIME => extract_docx_text(data)?,
            other => return Err(Error::UnsupportedFormat(other.to_string())),
        };

        Ok(extract_resume_fields(&text))
    }
}

type FieldExtractor = fn(&str) -> String;

/// Ordered extraction table over normalized text. A new heuristic is a new
/// row here; the pipeline never changes. "Not found" is an empty string.
const FIELD_EXTRACTORS: &[(&str, FieldExtractor)] = &[
    ("email", extract_email),
    ("phone", extract_phone),
    ("skills", |text| extract_section(text, "SKILLS")),
    ("education", |text| extract_section(text, "EDUCATION")),
    ("experience", extract_experience),
];

/// Heuristic field extraction over the acquired text. Name detection is the
/// only step that needs the original line structure; everything else runs on
/// whitespace-normalized text so PDF and Word inputs behave identically.
pub fn extract_resume_fields(text: &str) -> ParsedResumeFields {
    let top_name = name_from_top(text);
    let normalized = normalize_whitespace(text);

    let mut fields: std::collections::BTreeMap<&str, String> = std::collections::BTreeMap::new();
    for (field, extract) in FIELD_EXTRACTORS.iter().copied() {
        fields.insert(field, extract(&normalized));
    }

    let email = fields.remove("email").unwrap_or_default();
    let full_name = top_name.unwrap_or_else(|| name_from_email(&email));
    let (first_name, last_name) = split_name(&full_name);

    ParsedResumeFields {
        first_name,
        last_name,
        phone: fields.remove("phone").unwrap_or_default(),
        skills: fields.remove("skills").unwrap_or_default(),
        education: fields.remove("education").unwrap_or_default(),
        experience: fields.remove("experience").unwrap_or_default(),
        email,
        raw_text: normalized,
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_email(text: &str) -> String {
    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// First run of 10-14 digits, separators allowed, normalized to an optional
/// leading `+` followed by digits only.
fn extract_phone(text: &str) -> String {
    for m in PHONE_RE.find_iter(text) {
        let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
        if (10..=14).contains(&digits.len()) {
            let prefix = if m.as_str().starts_with('+') { "+" } else { "" };
            return format!("{prefix}{digits}");
        }
    }
    String::new()
}

/// An all-caps multi-word line near the top of the document, read before
/// whitespace normalization flattens the line structure.
fn name_from_top(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| UPPER_NAME_RE.is_match(line) && line.split_whitespace().count() >= 2)
        .map(|line| line.to_string())
}

/// Fallback display name from the email local-part: `john.smith@...` becomes
/// `John Smith`.
fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    local
        .split(['.', '_'])
        .filter(|token| !token.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn split_name(name: &str) -> (String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, rest)
}

/// Captures the text between `heading` and the next recognized heading (or
/// end of document). Headings must appear literally; synonyms yield an empty
/// section rather than a guess.
fn extract_section(text: &str, heading: &str) -> String {
    let mut body_start = None;
    for m in HEADING_RE.find_iter(text) {
        match body_start {
            None => {
                if m.as_str().eq_ignore_ascii_case(heading) {
                    body_start = Some(m.end());
                }
            }
            Some(start) => return text[start..m.start()].trim().to_string(),
        }
    }
    body_start
        .map(|start| text[start..].trim().to_string())
        .unwrap_or_default()
}

fn extract_experience(text: &str) -> String {
    EXPERIENCE_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Raw text from a .docx body: one line per `w:p` paragraph, no OCR.
fn extract_docx_text(data: &[u8]) -> Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| Error::ParseFailed(format!("not a valid docx archive: {e}")))?;

    let mut document_file = archive
        .by_name("word/document.xml")
        .map_err(|e| Error::ParseFailed(format!("docx missing document body: {e}")))?;
    let mut xml = String::new();
    document_file
        .read_to_string(&mut xml)
        .map_err(|e| Error::ParseFailed(format!("docx body unreadable: {e}")))?;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:p" {
                    in_paragraph = true;
                    current.clear();
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"w:p" {
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_paragraph {
                    let value = e
                        .xml_content()
                        .map_err(|e| Error::ParseFailed(format!("docx text unreadable: {e}")))?
                        .into_owned();
                    current.push_str(&value);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(Error::ParseFailed(format!("docx body unreadable: {err}"))),
            _ => {}
        }

        buf.clear();
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::docai_service::MockOcrBackend;
    use std::io::Write;

    const SAMPLE: &str = "John Smith\njohn.smith@acme.com\n+1-415-555-0100\nSKILLS\nGo, Rust\nEDUCATION\nB.S. Computer Science";

    #[test]
    fn extracts_fields_from_sample_resume() {
        let parsed = extract_resume_fields(SAMPLE);
        assert_eq!(parsed.first_name, "John");
        assert_eq!(parsed.last_name, "Smith");
        assert_eq!(parsed.email, "john.smith@acme.com");
        assert_eq!(parsed.phone, "+14155550100");
        assert_eq!(parsed.skills, "Go, Rust");
        assert_eq!(parsed.education, "B.S. Computer Science");
        assert_eq!(parsed.experience, "");
    }

    #[test]
    fn extraction_is_deterministic() {
        assert_eq!(extract_resume_fields(SAMPLE), extract_resume_fields(SAMPLE));
    }

    #[test]
    fn every_extractor_returns_empty_for_empty_input() {
        for (field, extract) in FIELD_EXTRACTORS.iter().copied() {
            assert_eq!(extract(""), "", "extractor {field} failed on empty input");
        }
    }

    #[test]
    fn missing_fields_come_back_empty() {
        let parsed = extract_resume_fields("nothing interesting in here");
        assert_eq!(parsed.first_name, "");
        assert_eq!(parsed.last_name, "");
        assert_eq!(parsed.email, "");
        assert_eq!(parsed.phone, "");
        assert_eq!(parsed.skills, "");
        assert_eq!(parsed.education, "");
        assert_eq!(parsed.experience, "");
    }

    #[test]
    fn all_caps_line_beats_email_fallback() {
        let parsed = extract_resume_fields("JANE ANN DOE\ncontact: other.person@x.com");
        assert_eq!(parsed.first_name, "JANE");
        assert_eq!(parsed.last_name, "ANN DOE");
    }

    #[test]
    fn single_caps_word_is_not_a_name() {
        let parsed = extract_resume_fields("SUMMARY\njane_doe@x.com");
        assert_eq!(parsed.first_name, "Jane");
        assert_eq!(parsed.last_name, "Doe");
    }

    #[test]
    fn phone_without_plus_keeps_bare_digits() {
        let parsed = extract_resume_fields("call 4155550100 anytime");
        assert_eq!(parsed.phone, "4155550100");
    }

    #[test]
    fn separated_phone_digits_are_joined() {
        let parsed = extract_resume_fields("mobile (415) 555-0100");
        assert_eq!(parsed.phone, "4155550100");
    }

    #[test]
    fn short_digit_runs_are_not_phones() {
        let parsed = extract_resume_fields("employee id 12345678 and nothing else");
        assert_eq!(parsed.phone, "");
    }

    #[test]
    fn section_synonyms_yield_empty_sections() {
        let parsed = extract_resume_fields("TECH STACK\nGo, Rust\nACADEMICS\nB.S.");
        assert_eq!(parsed.skills, "");
        assert_eq!(parsed.education, "");
    }

    #[test]
    fn experience_heading_bounds_the_skills_section() {
        let parsed =
            extract_resume_fields("SKILLS Go, Rust EXPERIENCE 5+ years building services");
        assert_eq!(parsed.skills, "Go, Rust");
        assert_eq!(parsed.experience, "5+ years");
    }

    #[tokio::test]
    async fn pdf_bytes_go_through_the_ocr_backend() {
        let mut ocr = MockOcrBackend::new();
        ocr.expect_process()
            .withf(|content, mime| content == b"%PDF-fake".as_slice() && mime == PDF_MIME)
            .returning(|_, _| Ok(SAMPLE.to_string()));

        let parser = ResumeParser::new(Arc::new(ocr));
        let parsed = parser.parse(b"%PDF-fake", PDF_MIME).await.unwrap();
        assert_eq!(parsed.email, "john.smith@acme.com");
    }

    #[tokio::test]
    async fn unknown_media_type_is_rejected_before_any_backend_call() {
        let mut ocr = MockOcrBackend::new();
        ocr.expect_process().times(0);

        let parser = ResumeParser::new(Arc::new(ocr));
        let err = parser.parse(b"fake", "image/png").await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let parser = ResumeParser::new(Arc::new(MockOcrBackend::new()));
        let err = parser.parse(b"", PDF_MIME).await.unwrap_err();
        assert!(matches!(err, Error::MissingFile));
    }

    #[tokio::test]
    async fn ocr_backend_failure_aborts_the_parse() {
        let mut ocr = MockOcrBackend::new();
        ocr.expect_process()
            .returning(|_, _| Err(Error::ParseFailed("backend down".into())));

        let parser = ResumeParser::new(Arc::new(ocr));
        let err = parser.parse(b"%PDF-fake", PDF_MIME).await.unwrap_err();
        assert!(matches!(err, Error::ParseFailed(_)));
    }

    fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[tokio::test]
    async fn docx_text_is_read_without_ocr() {
        let data = docx_with_paragraphs(&[
            "MARY JANE LEE",
            "mary.lee@acme.com",
            "SKILLS",
            "Postgres, Kubernetes",
        ]);

        let mut ocr = MockOcrBackend::new();
        ocr.expect_process().times(0);

        let parser = ResumeParser::new(Arc::new(ocr));
        let parsed = parser.parse(&data, DOCX_MIME).await.unwrap();
        assert_eq!(parsed.first_name, "MARY");
        assert_eq!(parsed.last_name, "JANE LEE");
        assert_eq!(parsed.skills, "Postgres, Kubernetes");
    }

    #[tokio::test]
    async fn garbage_docx_bytes_fail_the_parse() {
        let parser = ResumeParser::new(Arc::new(MockOcrBackend::new()));
        let err = parser.parse(b"not a zip archive", DOCX_MIME).await.unwrap_err();
        assert!(matches!(err, Error::ParseFailed(_)));
    }
}
