//! Tree rendering of the files a scan admitted.

use std::path::Path;

/// Builds a visual tree from `/`-separated paths relative to `root`.
///
/// Directories are derived from the file paths, so only directories that
/// contain an admitted file appear. The output is similar to the `tree`
/// command.
pub fn build_tree_from_paths<S: AsRef<str>>(root: &Path, paths: &[S]) -> String {
    let mut sorted: Vec<Vec<&str>> = paths
        .iter()
        .map(|p| p.as_ref().split('/').filter(|c| !c.is_empty()).collect())
        .filter(|parts: &Vec<&str>| !parts.is_empty())
        .collect();
    sorted.sort();

    let mut lines = Vec::new();
    lines.push(format!(".  # {}", root.display()));

    let mut open_dirs: Vec<&str> = Vec::new();
    for parts in sorted {
        let (file, dirs) = match parts.split_last() {
            Some(split) => split,
            None => continue,
        };
        let shared = open_dirs
            .iter()
            .zip(dirs.iter())
            .take_while(|(a, b)| a == b)
            .count();
        open_dirs.truncate(shared);
        for dir in &dirs[shared..] {
            lines.push(format!("{}{}/", prefix(open_dirs.len() + 1), dir));
            open_dirs.push(*dir);
        }
        lines.push(format!("{}{}", prefix(dirs.len() + 1), file));
    }

    lines.join("\n")
}

fn prefix(depth: usize) -> String {
    "│   ".repeat(depth - 1) + "├── "
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nests_files_under_their_directories() {
        let paths = ["src/main.rs", "README.md", "src/cli/args.rs"];
        let tree = build_tree_from_paths(Path::new("/project"), &paths);
        let expected = [
            ".  # /project",
            "├── README.md",
            "├── src/",
            "│   ├── cli/",
            "│   │   ├── args.rs",
            "│   ├── main.rs",
        ]
        .join("\n");
        assert_eq!(tree, expected);
    }

    #[test]
    fn empty_input_is_just_the_root() {
        let tree = build_tree_from_paths::<&str>(Path::new("."), &[]);
        assert_eq!(tree, ".  # .");
    }
}
