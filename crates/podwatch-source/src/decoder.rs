//! Incremental decoder for a stream of concatenated JSON documents
//!
//! `kubectl get -o json --watch` writes one pretty-printed document per
//! event with no framing, so a document may be split across any number of
//! reads. The decoder buffers bytes until complete documents are available.

use serde_json::Value;

/// Buffers raw bytes and yields every complete JSON document
#[derive(Debug, Default)]
pub struct JsonStreamDecoder {
    buf: Vec<u8>,
}

impl JsonStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and decode every complete document now available.
    ///
    /// A trailing partial document stays buffered. A syntax error discards
    /// the whole buffer, since there is no reliable resync point.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<serde_json::Result<Value>> {
        self.buf.extend_from_slice(bytes);

        let mut out = Vec::new();
        let mut poisoned = false;

        let consumed = {
            let mut stream = serde_json::Deserializer::from_slice(&self.buf).into_iter::<Value>();
            loop {
                match stream.next() {
                    Some(Ok(value)) => out.push(Ok(value)),
                    Some(Err(e)) if e.is_eof() => break,
                    Some(Err(e)) => {
                        out.push(Err(e));
                        poisoned = true;
                        break;
                    }
                    None => break,
                }
            }
            stream.byte_offset()
        };

        if poisoned {
            self.buf.clear();
        } else {
            self.buf.drain(..consumed);
        }

        out
    }

    /// Bytes held back waiting for the rest of a document
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_document() {
        let mut decoder = JsonStreamDecoder::new();
        let docs = decoder.push(br#"{"type":"ADDED"}"#);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].as_ref().unwrap()["type"], "ADDED");
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn test_concatenated_pretty_documents() {
        let input = b"{\n  \"type\": \"ADDED\"\n}\n{\n  \"type\": \"DELETED\"\n}\n";
        let mut decoder = JsonStreamDecoder::new();
        let docs: Vec<Value> = decoder
            .push(input)
            .into_iter()
            .map(|d| d.unwrap())
            .collect();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1]["type"], "DELETED");
    }

    #[test]
    fn test_document_split_across_reads() {
        let mut decoder = JsonStreamDecoder::new();
        assert!(decoder.push(br#"{"type":"MOD"#).is_empty());
        assert!(decoder.pending() > 0);

        let docs = decoder.push(br#"IFIED","object":{}}"#);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].as_ref().unwrap()["type"], "MODIFIED");
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn test_complete_then_partial_keeps_partial() {
        let mut decoder = JsonStreamDecoder::new();
        let docs = decoder.push(br#"{"a":1} {"b":"#);
        assert_eq!(docs.len(), 1);

        let docs = decoder.push(b"2}");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].as_ref().unwrap()["b"], 2);
    }

    #[test]
    fn test_syntax_error_clears_buffer() {
        let mut decoder = JsonStreamDecoder::new();
        let docs = decoder.push(b"{\"a\": ]");
        assert_eq!(docs.len(), 1);
        assert!(docs[0].is_err());
        assert_eq!(decoder.pending(), 0);

        // Recovers on the next well-formed document
        let docs = decoder.push(br#"{"ok":true}"#);
        assert_eq!(docs.len(), 1);
        assert!(docs[0].is_ok());
    }
}
