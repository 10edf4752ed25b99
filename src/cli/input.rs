// Comment list input

use std::io::BufRead;

/// Read one comment per line, skipping blank lines
pub fn read_comments<R: BufRead>(reader: R) -> std::io::Result<Vec<String>> {
    let mut comments = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if !line.is_empty() {
            comments.push(line.to_string());
        }
    }
    Ok(comments)
}
