//! Test utilities for building solutions on disk

use std::fs;

use tempfile::TempDir;

pub const CSHARP_KIND: &str = "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}";

/// Render a `.sln` manifest declaring `(name, relative path)` projects.
pub fn sln_manifest(projects: &[(&str, &str)]) -> String {
    let mut text = String::from(
        "\nMicrosoft Visual Studio Solution File, Format Version 12.00\n# Visual Studio Version 17\n",
    );
    for (i, (name, path)) in projects.iter().enumerate() {
        text.push_str(&format!(
            "Project(\"{}\") = \"{}\", \"{}\", \"{{00000000-0000-0000-0000-{:012}}}\"\nEndProject\n",
            CSHARP_KIND,
            name,
            path,
            i + 1
        ));
    }
    text.push_str("Global\nEndGlobal\n");
    text
}

/// Render an SDK-style project file referencing `references`.
pub fn csproj(references: &[&str]) -> String {
    let mut text = String::from("\u{FEFF}<Project Sdk=\"Microsoft.NET.Sdk\">\n  <ItemGroup>\n");
    for reference in references {
        text.push_str(&format!("    <ProjectReference Include=\"{}\" />\n", reference));
    }
    text.push_str("  </ItemGroup>\n</Project>\n");
    text
}

/// Create a temporary directory with a specific file structure
pub fn create_solution_with_structure(structure: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for (path, content) in structure {
        let full_path = root.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }

        fs::write(&full_path, content).unwrap();
    }

    temp_dir
}

/// App -> Core, App -> Ui, Ui -> Core, Tests -> App, plus an orphan Tools
/// project and a Docs project whose file is missing.
pub fn create_layered_solution() -> TempDir {
    let manifest = sln_manifest(&[
        ("App", "src\\App\\App.csproj"),
        ("Core", "src\\Core\\Core.csproj"),
        ("Ui", "src\\Ui\\Ui.csproj"),
        ("Tests", "test\\Tests\\Tests.csproj"),
        ("Tools", "tools\\Tools.csproj"),
        ("Docs", "docs\\Docs.csproj"),
    ]);

    let app = csproj(&["..\\Core\\Core.csproj", "..\\Ui\\Ui.csproj"]);
    let ui = csproj(&["..\\Core\\Core.csproj"]);
    let tests = csproj(&["..\\..\\src\\App\\App.csproj"]);
    let empty = csproj(&[]);

    create_solution_with_structure(&[
        ("Layered.sln", manifest.as_str()),
        ("src/App/App.csproj", app.as_str()),
        ("src/Core/Core.csproj", empty.as_str()),
        ("src/Ui/Ui.csproj", ui.as_str()),
        ("test/Tests/Tests.csproj", tests.as_str()),
        ("tools/Tools.csproj", empty.as_str()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layered_solution() {
        let temp_dir = create_layered_solution();
        let root = temp_dir.path();

        assert!(root.join("Layered.sln").exists());
        assert!(root.join("src/App/App.csproj").exists());
        assert!(root.join("test/Tests/Tests.csproj").exists());
        assert!(!root.join("docs/Docs.csproj").exists());
    }
}
