use std::path::Path;

/// The kinds of roster files that can be imported.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputFormat {
    Csv,
    /// Both .xlsx and .xls
    Excel,
}

impl InputFormat {
    /// Finds the format from the extension of the file, ignoring the case.
    pub fn detect(path: &str) -> Option<InputFormat> {
        let lower = path.to_lowercase();
        if lower.ends_with(".csv") {
            Some(InputFormat::Csv)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Some(InputFormat::Excel)
        } else {
            None
        }
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}
