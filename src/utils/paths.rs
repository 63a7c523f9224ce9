use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix inserted between the original path and its extension
pub const TEMP_MARKER: &str = "-modified";

/// Extension of the base name, from the last `.` onward (dot included).
///
/// Unlike [`Path::extension`], a leading dot counts: `.bashrc` yields `.bashrc`.
/// Returns an empty string when the name has no dot.
pub fn extension_of(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return String::new(),
    };

    match name.rfind('.') {
        Some(idx) => name[idx..].to_string(),
        None => String::new(),
    }
}

/// Working file written next to `path`: `<path>-modified<ext>`
pub fn temp_path_for(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let mut temp = OsString::from(path.as_os_str());
    temp.push(TEMP_MARKER);
    temp.push(extension_of(path));
    PathBuf::from(temp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("dir/a.txt"), ".txt");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(".bashrc"), ".bashrc");
        assert_eq!(extension_of("name."), ".");
        assert_eq!(extension_of("some.dir/README"), "");
    }

    #[test]
    fn test_temp_path_for() {
        assert_eq!(
            temp_path_for("root/text/a.txt"),
            PathBuf::from("root/text/a.txt-modified.txt")
        );
        assert_eq!(
            temp_path_for("root/Makefile"),
            PathBuf::from("root/Makefile-modified")
        );
        assert_eq!(
            temp_path_for("/abs/.env"),
            PathBuf::from("/abs/.env-modified.env")
        );
    }

    #[test]
    fn test_temp_path_stays_in_same_directory() {
        let original = Path::new("a/b/c.rs");
        assert_eq!(temp_path_for(original).parent(), original.parent());
    }
}
