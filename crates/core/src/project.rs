//! Project directory storage
//!
//! Generated files live as plain `.v` files in a project directory. These
//! functions are the only part of the core that touches the filesystem.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::generate::naming::EXTENSION;
use crate::generate::sanitize::normalize_line_endings;

/// List all Verilog files in the project directory
///
/// Returns a sorted vector of file names (with extension). A missing
/// directory is an empty project.
pub fn list_files(project_dir: &Path) -> Result<Vec<String>, Error> {
    if !project_dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();

    for entry in fs::read_dir(project_dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("v") {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_string());
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Names already taken in the project, for collision-free naming.
pub fn existing_names(project_dir: &Path) -> Result<HashSet<String>, Error> {
    Ok(list_files(project_dir)?.into_iter().collect())
}

/// Load a file from the project directory
pub fn load_file(project_dir: &Path, name: &str) -> Result<String, Error> {
    validate_file_name(name)?;

    let path = project_dir.join(name);

    if !path.exists() {
        return Err(Error::FileNotFound(name.to_string()));
    }

    fs::read_to_string(&path).map_err(Error::from)
}

/// Save a file to the project directory
///
/// # Arguments
/// * `project_dir` - Directory holding the project's `.v` files
/// * `name` - File name, including the `.v` extension
/// * `content` - Source text; line endings are normalized to `\n`
/// * `overwrite` - If true, replaces an existing file; if false, errors on existing
pub fn save_file(
    project_dir: &Path,
    name: &str,
    content: &str,
    overwrite: bool,
) -> Result<(), Error> {
    validate_file_name(name)?;

    fs::create_dir_all(project_dir)?;

    let path = project_dir.join(name);

    if path.exists() && !overwrite {
        return Err(Error::FileExists(name.to_string()));
    }

    log::debug!("Writing {}", path.display());
    fs::write(&path, normalize_line_endings(content))?;
    Ok(())
}

/// Save a main file and its optional testbench as one unit
///
/// Both names are validated before anything is written. If the testbench
/// cannot be written, the main file written by this call is removed again
/// and the testbench error is returned.
pub fn save_pair(
    project_dir: &Path,
    main: (&str, &str),
    testbench: Option<(&str, &str)>,
) -> Result<(), Error> {
    let (main_name, main_content) = main;
    validate_file_name(main_name)?;
    if let Some((testbench_name, _)) = testbench {
        validate_file_name(testbench_name)?;
    }

    save_file(project_dir, main_name, main_content, false)?;

    let Some((testbench_name, testbench_content)) = testbench else {
        return Ok(());
    };

    if let Err(e) = save_file(project_dir, testbench_name, testbench_content, false) {
        log::warn!("Writing {testbench_name} failed, removing {main_name}");
        if let Err(cleanup) = delete_file(project_dir, main_name) {
            log::error!("Could not remove {main_name}: {cleanup}");
        }
        return Err(e);
    }

    Ok(())
}

/// Delete a file from the project directory
pub fn delete_file(project_dir: &Path, name: &str) -> Result<(), Error> {
    validate_file_name(name)?;

    let path = project_dir.join(name);

    if !path.exists() {
        return Err(Error::FileNotFound(name.to_string()));
    }

    log::debug!("Removing {}", path.display());
    fs::remove_file(&path).map_err(Error::from)
}

/// Validate a file name before it reaches the filesystem
///
/// File names must:
/// - Not be empty
/// - End with the `.v` extension
/// - Only contain lowercase alphanumeric characters, hyphens, underscores and the extension dot
fn validate_file_name(name: &str) -> Result<(), Error> {
    let Some(stem) = name.strip_suffix(EXTENSION) else {
        return Err(Error::InvalidFileName(format!(
            "{name} (must end with {EXTENSION})"
        )));
    };

    if stem.is_empty() {
        return Err(Error::InvalidFileName(
            "File name cannot be empty".to_string(),
        ));
    }

    if !stem
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(Error::InvalidFileName(format!(
            "{name} (only lowercase alphanumeric characters, hyphens, and underscores)"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path();

        let content = "module adder(input a, input b, output s);\nendmodule";
        save_file(project_dir, "adder.v", content, false).unwrap();

        let loaded = load_file(project_dir, "adder.v").unwrap();
        assert_eq!(loaded, content);
    }

    #[test]
    fn test_save_normalizes_line_endings() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path();

        save_file(project_dir, "crlf.v", "a\r\nb\rc", false).unwrap();
        assert_eq!(load_file(project_dir, "crlf.v").unwrap(), "a\nb\nc");
    }

    #[test]
    fn test_list_files_only_verilog_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path();

        save_file(project_dir, "mux.v", "m", false).unwrap();
        save_file(project_dir, "adder.v", "a", false).unwrap();
        save_file(project_dir, "adder-testbench.v", "t", false).unwrap();
        fs::write(project_dir.join("notes.txt"), "ignore me").unwrap();

        let files = list_files(project_dir).unwrap();
        assert_eq!(files, vec!["adder-testbench.v", "adder.v", "mux.v"]);
    }

    #[test]
    fn test_existing_names() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path();

        save_file(project_dir, "adder.v", "a", false).unwrap();

        let names = existing_names(project_dir).unwrap();
        assert!(names.contains("adder.v"));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_save_existing_without_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path();

        save_file(project_dir, "adder.v", "one", false).unwrap();

        let result = save_file(project_dir, "adder.v", "two", false);
        assert!(matches!(result, Err(Error::FileExists(_))));
    }

    #[test]
    fn test_save_existing_with_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path();

        save_file(project_dir, "adder.v", "one", false).unwrap();
        save_file(project_dir, "adder.v", "two", true).unwrap();

        assert_eq!(load_file(project_dir, "adder.v").unwrap(), "two");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_file(temp_dir.path(), "missing.v");
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("full-adder.v").is_ok());
        assert!(validate_file_name("alu_8bit-testbench.v").is_ok());
        assert!(validate_file_name(".v").is_err());
        assert!(validate_file_name("adder").is_err());
        assert!(validate_file_name("Adder.v").is_err());
        assert!(validate_file_name("../etc/passwd.v").is_err());
        assert!(validate_file_name("a b.v").is_err());
    }

    #[test]
    fn test_list_nonexistent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path().join("nonexistent");

        let files = list_files(&project_dir).unwrap();
        assert_eq!(files, Vec::<String>::new());
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path().join("nested").join("project");

        save_file(&project_dir, "adder.v", "a", false).unwrap();
        assert_eq!(list_files(&project_dir).unwrap(), vec!["adder.v"]);
    }

    #[test]
    fn test_save_pair_writes_both_files() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path();

        save_pair(project_dir, ("alu.v", "m"), Some(("alu-testbench.v", "t"))).unwrap();

        assert_eq!(list_files(project_dir).unwrap(), vec!["alu-testbench.v", "alu.v"]);
        assert_eq!(load_file(project_dir, "alu-testbench.v").unwrap(), "t");
    }

    #[test]
    fn test_save_pair_removes_main_when_testbench_fails() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path();
        save_file(project_dir, "alu-testbench.v", "kept", false).unwrap();

        let result = save_pair(project_dir, ("alu.v", "m"), Some(("alu-testbench.v", "t")));

        assert!(matches!(result, Err(Error::FileExists(_))));
        assert_eq!(list_files(project_dir).unwrap(), vec!["alu-testbench.v"]);
        assert_eq!(load_file(project_dir, "alu-testbench.v").unwrap(), "kept");
    }

    #[test]
    fn test_save_pair_validates_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path();

        let result = save_pair(project_dir, ("alu.v", "m"), Some(("Bad Name.v", "t")));

        assert!(matches!(result, Err(Error::InvalidFileName(_))));
        assert!(list_files(project_dir).unwrap().is_empty());
    }

    #[test]
    fn test_delete_file() {
        let temp_dir = TempDir::new().unwrap();
        let project_dir = temp_dir.path();
        save_file(project_dir, "alu.v", "m", false).unwrap();

        delete_file(project_dir, "alu.v").unwrap();

        assert!(list_files(project_dir).unwrap().is_empty());
        assert!(matches!(
            delete_file(project_dir, "alu.v"),
            Err(Error::FileNotFound(_))
        ));
    }
}
