//! Minimal `multipart/form-data` encoder for a single file part.
//!
//! The upload call takes raw bytes plus a content type, so the form is
//! encoded up front instead of through a streaming request body.

use uuid::Uuid;

/// Encoded form and the matching `Content-Type` header value.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Encode `content` as the only part of a form, under `field`, carrying
/// `filename`.
pub fn encode_file(field: &str, filename: &str, content: &[u8]) -> MultipartBody {
    let boundary = format!("guardian-{}", Uuid::new_v4().simple());
    encode_with_boundary(&boundary, field, filename, content)
}

fn encode_with_boundary(boundary: &str, field: &str, filename: &str, content: &[u8]) -> MultipartBody {
    let header = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n",
        escape(field),
        escape(filename),
    );
    let footer = format!("\r\n--{boundary}--\r\n");

    let mut bytes = Vec::with_capacity(header.len() + content.len() + footer.len());
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(content);
    bytes.extend_from_slice(footer.as_bytes());

    MultipartBody { content_type: format!("multipart/form-data; boundary={boundary}"), bytes }
}

// Quotes and line breaks would end the header value early.
fn escape(value: &str) -> String {
    value.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}
