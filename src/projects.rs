//! `project` subcommands: edit the ordered `[[projects]]` list in `.stackref.toml`.
//!
//! Edits go through `toml_edit` so comments and layout survive.

use std::path::{Path, PathBuf};

use toml_edit::{ArrayOfTables, DocumentMut, Item, Table, value};

use crate::config::{CONFIG_FILE, Config};
use crate::error::Error;

// ── CLI commands ──────────────────────────────────────────────────────

/// Append a project, or repoint an existing one with the same name.
///
/// # Errors
///
/// Returns errors from reading, parsing or writing the config file.
pub fn cmd_add(root: &Path, name: &str, path: &str) -> Result<(), Error> {
    if add_to_config(root, name, path)? {
        println!("Updated project: {name} -> {path}");
    } else {
        println!("Added project: {name} -> {path}");
    }
    return Ok(());
}

/// Print configured projects in search order.
///
/// # Errors
///
/// Returns errors from config loading.
pub fn cmd_list(root: &Path) -> Result<(), Error> {
    let config = Config::load(root)?;
    if config.projects.is_empty() {
        println!("No projects configured.");
        return Ok(());
    }

    for project in &config.projects {
        let shown = project.path.strip_prefix(root).unwrap_or(&project.path);
        println!("{} -> {}", project.name, shown.display());
    }
    return Ok(());
}

/// Remove a project by name.
///
/// # Errors
///
/// Returns `Error::UnknownProject` if no project has that name.
pub fn cmd_remove(root: &Path, name: &str) -> Result<(), Error> {
    remove_from_config(root, name)?;
    println!("Removed project: {name}");
    return Ok(());
}

// ── Config file editing ───────────────────────────────────────────────

/// Add or update a `[[projects]]` entry. Returns whether an entry was updated.
///
/// # Errors
///
/// Returns `Error::TomlEdit` if the config can't be parsed,
/// or `Error::Io` if reading or writing fails.
fn add_to_config(root: &Path, name: &str, project_path: &str) -> Result<bool, Error> {
    let (config_path, mut doc) = read_config_doc(root)?;

    if !doc.contains_key("projects") {
        doc.insert("projects", Item::ArrayOfTables(ArrayOfTables::new()));
    }
    let Some(projects) = doc.get_mut("projects").and_then(Item::as_array_of_tables_mut) else {
        return Err(Error::ParseFailed {
            file: config_path,
            reason: "`projects` must be an array of tables".to_string(),
        });
    };

    let existing = projects
        .iter_mut()
        .find(|t| return t.get("name").and_then(Item::as_str) == Some(name));
    let updated = if let Some(table) = existing {
        table["path"] = value(project_path);
        true
    } else {
        let mut table = Table::new();
        table["name"] = value(name);
        table["path"] = value(project_path);
        projects.push(table);
        false
    };

    std::fs::write(&config_path, doc.to_string())?;
    return Ok(updated);
}

/// Parse `.stackref.toml` into a format-preserving document.
/// An absent file is an empty document.
///
/// # Errors
///
/// Returns `Error::Io` on read failure or `Error::TomlEdit` on parse failure.
fn read_config_doc(root: &Path) -> Result<(PathBuf, DocumentMut), Error> {
    let config_path = root.join(CONFIG_FILE);
    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::Io(e)),
    };

    let doc: DocumentMut = content.parse()?;
    return Ok((config_path, doc));
}

/// Remove the `[[projects]]` entry named `name`.
///
/// # Errors
///
/// Returns `Error::UnknownProject` if the name isn't found.
fn remove_from_config(root: &Path, name: &str) -> Result<(), Error> {
    let (config_path, mut doc) = read_config_doc(root)?;
    let unknown = || {
        return Error::UnknownProject {
            name: name.to_string(),
        };
    };

    let projects = doc
        .get_mut("projects")
        .and_then(Item::as_array_of_tables_mut)
        .ok_or_else(unknown)?;
    let index = projects
        .iter()
        .position(|t| return t.get("name").and_then(Item::as_str) == Some(name))
        .ok_or_else(unknown)?;
    projects.remove(index);

    std::fs::write(&config_path, doc.to_string())?;
    return Ok(());
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    fn names(root: &Path) -> Vec<String> {
        return Config::load(root)
            .unwrap()
            .projects
            .into_iter()
            .map(|p| return p.name)
            .collect();
    }

    #[test]
    fn add_creates_file_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!add_to_config(dir.path(), "app", "src/App").unwrap());
        assert!(!add_to_config(dir.path(), "lib", "src/Lib").unwrap());
        assert_eq!(names(dir.path()), vec!["app", "lib"]);
    }

    #[test]
    fn add_existing_updates_path() {
        let dir = tempfile::tempdir().unwrap();
        add_to_config(dir.path(), "app", "src/App").unwrap();
        assert!(add_to_config(dir.path(), "app", "src/NewApp").unwrap());
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.projects.len(), 1);
        assert_eq!(config.projects.first().unwrap().path, dir.path().join("src/NewApp"));
    }

    #[test]
    fn remove_preserves_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "# search order matters\nexclude = [\"Generated/\"]\n\n[[projects]]\nname = \"app\"\npath = \"src/App\"\n\n[[projects]]\nname = \"lib\"\npath = \"src/Lib\"\n",
        )
        .unwrap();

        remove_from_config(dir.path(), "app").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# search order matters"));
        assert!(content.contains("exclude = [\"Generated/\"]"));
        assert_eq!(names(dir.path()), vec!["lib"]);
    }

    #[test]
    fn remove_unknown_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = remove_from_config(dir.path(), "ghost").unwrap_err();
        assert!(matches!(err, Error::UnknownProject { name } if name == "ghost"));
    }
}
