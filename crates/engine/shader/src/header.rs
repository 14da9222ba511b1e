//! Shared header prepended to every shader stage

/// Source text compiled ahead of every stage body.
///
/// Declares the GLSL ES version, a `PI` constant and the default float
/// precision. It is newline-terminated, so the first line of a body lands on
/// line `header_line_count() + 1` of the compiled source.
pub const SHADER_HEADER: &str = "#version 300 es
#define PI 3.1415926535897932
precision highp float;
";

/// Number of lines [`SHADER_HEADER`] occupies ahead of a stage body.
pub const fn header_line_count() -> usize {
    let bytes = SHADER_HEADER.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' {
            count += 1;
        }
        i += 1;
    }
    count
}

/// Concatenate the header and `body` into the text handed to the compiler.
pub fn with_header(body: &str) -> String {
    let mut source = String::with_capacity(SHADER_HEADER.len() + body.len());
    source.push_str(SHADER_HEADER);
    source.push_str(body);
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_three_lines() {
        assert_eq!(header_line_count(), 3);
        assert!(SHADER_HEADER.ends_with('\n'));
    }

    #[test]
    fn test_header_declares_version_first() {
        assert!(SHADER_HEADER.starts_with("#version 300 es\n"));
        assert!(SHADER_HEADER.contains("precision highp float;"));
    }

    #[test]
    fn test_with_header_keeps_body_unmodified() {
        let body = "\nvoid main() {}\n";
        let source = with_header(body);
        assert!(source.starts_with(SHADER_HEADER));
        assert_eq!(&source[SHADER_HEADER.len()..], body);
    }
}
