use crate::http::request::{Method, Request, Version};
use std::collections::HashMap;

/// Parses one complete HTTP message into a [`Request`].
///
/// Parsing never fails. A missing or malformed request line leaves the
/// corresponding fields as `None`, and the response engine reports the
/// problem as a status code. `\r\n` and bare `\n` line endings are accepted
/// anywhere.
pub fn parse_request(raw: &[u8]) -> Request {
    let text = String::from_utf8_lossy(raw);
    let (head, body) = split_head_body(&text);

    let mut lines = head.lines();

    // Request line
    let mut parts = lines
        .next()
        .unwrap_or("")
        .split([' ', '\t'])
        .filter(|token| !token.is_empty());

    let method = parts.next().map(Method::parse);
    let path = parts.next().map(str::to_string);
    let version = parts.next().and_then(Version::from_token);

    // Headers
    let mut headers = HashMap::new();
    fold_header_lines(lines, &mut headers);

    // Body
    let mut body = body.filter(|b| !b.is_empty()).map(str::to_string);

    if headers.get("transfer-encoding").map(String::as_str) == Some("chunked") {
        if let Some(raw_body) = body.take() {
            body = Some(decode_chunked(&raw_body, &mut headers));
        }
    }

    tracing::trace!(
        method = ?method,
        path = ?path,
        version = ?version,
        headers = headers.len(),
        "Parsed request"
    );

    Request {
        method,
        path,
        version,
        headers,
        body,
    }
}

/// Splits at the first blank line, whatever mix of `\r\n` and `\n` forms it.
fn split_head_body(text: &str) -> (&str, Option<&str>) {
    match find_head_end(text.as_bytes()) {
        Some((head_end, body_start)) => (&text[..head_end], Some(&text[body_start..])),
        None => (text, None),
    }
}

/// Locates the first blank line, returning the end of the head and the start
/// of the body.
pub(crate) fn find_head_end(bytes: &[u8]) -> Option<(usize, usize)> {
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'\n' {
            continue;
        }

        let rest = &bytes[i + 1..];
        let separator_tail = if rest.starts_with(b"\n") {
            1
        } else if rest.starts_with(b"\r\n") {
            2
        } else {
            continue;
        };

        let head_end = if i > 0 && bytes[i - 1] == b'\r' { i - 1 } else { i };
        return Some((head_end, i + 1 + separator_tail));
    }

    None
}

/// Folds header lines into `headers`.
///
/// A line starting with a space or tab continues the previous header: its
/// trimmed text is appended with no separator. Any other line starts a new
/// header, overwriting an existing value of the same name.
fn fold_header_lines<'a>(
    lines: impl Iterator<Item = &'a str>,
    headers: &mut HashMap<String, String>,
) {
    let mut current: Option<String> = None;

    for line in lines {
        if line.is_empty() {
            continue;
        }

        if line.starts_with([' ', '\t']) {
            match current.as_ref().and_then(|key| headers.get_mut(key)) {
                Some(value) => value.push_str(line.trim()),
                None => tracing::debug!(line, "Continuation line without a header, ignored"),
            }
            continue;
        }

        let (key, value) = split_header_line(line);
        let key = key.to_ascii_lowercase();
        headers.insert(key.clone(), value.to_string());
        current = Some(key);
    }
}

/// Splits on the first `:` that is followed by one or more spaces or tabs.
///
/// A line with no such separator becomes a header with an empty value.
fn split_header_line(line: &str) -> (&str, &str) {
    for (idx, _) in line.match_indices(':') {
        let rest = &line[idx + 1..];
        if rest.starts_with([' ', '\t']) {
            return (&line[..idx], rest.trim_start_matches([' ', '\t']));
        }
    }

    (line, "")
}

/// Decodes a chunked body laid out as size-line / data-line pairs.
///
/// Chunk extensions after `;` are discarded. Lines after the zero-size chunk
/// are trailer headers merged into `headers`. Sets `content-length` to the sum
/// of the declared chunk sizes and returns the concatenated chunk data.
fn decode_chunked(body: &str, headers: &mut HashMap<String, String>) -> String {
    let mut lines = body.lines();
    let mut decoded = String::new();
    let mut total: usize = 0;

    while let Some(size_line) = lines.next() {
        let size_token = size_line.split(';').next().unwrap_or("").trim();
        if size_token.is_empty() {
            continue;
        }

        let size = match usize::from_str_radix(size_token, 16) {
            Ok(size) => size,
            Err(_) => {
                tracing::debug!(size_line, "Invalid chunk size, stopping chunk decoding");
                break;
            }
        };

        if size == 0 {
            fold_header_lines(lines.by_ref(), headers);
            break;
        }

        decoded.push_str(lines.next().unwrap_or(""));
        total = total.saturating_add(size);
    }

    headers.insert("content-length".to_string(), total.to_string());
    decoded
}
