//! Kernel list parser
//!
//! One kernel per line: `<entrypoint-name>: <start-line>-<end-line>`.
//! Blank lines and `#` comments are ignored. A bad line drops only its own
//! kernel; a repeated name keeps the first declaration.

use crate::features::kernel_boundary::domain::{KernelLineRange, KernelList, KernelListError};
use crate::shared::models::LineSpan;

pub fn parse_kernel_list(text: &str) -> (KernelList, Vec<KernelListError>) {
    let mut list = KernelList::new();
    let mut errors = Vec::new();

    for (raw, number) in text.lines().zip(1u32..) {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line, number) {
            Ok(entry) => {
                let name = entry.name.clone();
                if !list.insert(entry) {
                    errors.push(KernelListError::new(
                        number,
                        raw,
                        format!("kernel '{}' is already declared", name),
                    ));
                }
            }
            Err(err) => errors.push(err),
        }
    }

    (list, errors)
}

fn parse_line(line: &str, number: u32) -> Result<KernelLineRange, KernelListError> {
    // mangled names may contain ':' themselves, the range never does
    let (name, range) = line
        .rsplit_once(':')
        .ok_or_else(|| KernelListError::new(number, line, "expected '<name>: <start>-<end>'"))?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(KernelListError::new(number, line, "invalid kernel name"));
    }

    let (start, end) = range
        .split_once('-')
        .ok_or_else(|| KernelListError::new(number, line, "expected a '<start>-<end>' line range"))?;
    let start = parse_line_number(start, line, number)?;
    let end = parse_line_number(end, line, number)?;
    if start > end {
        return Err(KernelListError::new(
            number,
            line,
            format!("inverted line range {}-{}", start, end),
        ));
    }

    Ok(KernelLineRange {
        name: name.to_string(),
        span: LineSpan::new(start, end),
        list_line: number,
    })
}

fn parse_line_number(text: &str, line: &str, number: u32) -> Result<u32, KernelListError> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| KernelListError::new(number, line, format!("'{}' is not a line number", text.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries() {
        let (list, errors) = parse_kernel_list("main: 10-25\n\n# helpers\nreduce:30-41\n");
        assert!(errors.is_empty());
        assert_eq!(list.len(), 2);
        let main = list.get("main").unwrap();
        assert_eq!(main.span, LineSpan::new(10, 25));
        assert_eq!(main.list_line, 1);
        assert_eq!(list.get("reduce").unwrap().list_line, 4);
    }

    #[test]
    fn test_mangled_name_with_colons() {
        let (list, errors) = parse_kernel_list("ns::kernel: 3-9");
        assert!(errors.is_empty());
        assert!(list.contains("ns::kernel"));
    }

    #[test]
    fn test_malformed_lines_drop_only_that_kernel() {
        let (list, errors) = parse_kernel_list("good: 1-5\nbad 1-5\ninverted: 9-3\nnan: a-7\nmissing: 12\n");
        assert_eq!(list.names().collect::<Vec<_>>(), vec!["good"]);
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.iter().map(|e| e.line).collect::<Vec<_>>(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_duplicate_name_keeps_first() {
        let (list, errors) = parse_kernel_list("k: 1-5\nk: 7-9\n");
        assert_eq!(list.len(), 1);
        assert_eq!(list.get("k").unwrap().span, LineSpan::new(1, 5));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 2);
    }
}
