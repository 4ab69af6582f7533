use projview::{
    DirectoryEntry, FileReader, MarkdownRenderer, ProjviewError, ReaderBuilder, RenderKind,
    build_tree, read_file,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn names(entries: &[DirectoryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name()).collect()
}

fn collect_file_paths(entries: &[DirectoryEntry], out: &mut Vec<String>) {
    for entry in entries {
        match entry {
            DirectoryEntry::Directory { children, .. } => collect_file_paths(children, out),
            DirectoryEntry::File { path, .. } => out.push(path.clone()),
        }
    }
}

struct FailingRenderer;
impl MarkdownRenderer for FailingRenderer {
    fn render(&self, _markdown: &str) -> Result<String, String> {
        Err("renderer unavailable".into())
    }
}

#[test]
fn test_tree_missing_root_is_empty() {
    let dir = tempdir().unwrap();
    assert!(build_tree(dir.path().join("not-extracted")).is_empty());
}
#[test]
fn test_tree_directories_before_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.txt"), "b").unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    let tree = build_tree(dir.path());
    assert_eq!(
        tree,
        vec![
            DirectoryEntry::Directory {
                name: "a".into(),
                path: "a".into(),
                children: vec![],
            },
            DirectoryEntry::File {
                name: "b.txt".into(),
                path: "b.txt".into(),
            },
        ]
    );
}
#[test]
fn test_tree_case_insensitive_order() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("Zed")).unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("Beta.txt"), "").unwrap();
    fs::write(dir.path().join("alpha.txt"), "").unwrap();
    fs::write(dir.path().join("README.md"), "").unwrap();
    let tree = build_tree(dir.path());
    assert_eq!(
        names(&tree),
        vec!["docs", "Zed", "alpha.txt", "Beta.txt", "README.md"]
    );
}
#[test]
fn test_tree_nested_paths_use_forward_slashes() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src/util")).unwrap();
    fs::write(dir.path().join("src/util/mod.rs"), "").unwrap();
    fs::write(dir.path().join("src/main.rs"), "").unwrap();
    fs::write(dir.path().join(".env"), "KEY=1").unwrap();
    let tree = build_tree(dir.path());
    assert_eq!(names(&tree), vec!["src", ".env"]);
    let src = &tree[0];
    assert_eq!(names(src.children()), vec!["util", "main.rs"]);
    let util = &src.children()[0];
    assert_eq!(util.path(), "src/util");
    assert_eq!(util.children()[0].path(), "src/util/mod.rs");
    for entry in [src, util, &util.children()[0]] {
        assert!(dir.path().join(entry.path()).exists());
    }
}
#[test]
fn test_tree_serializes_tagged() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "").unwrap();
    let json = serde_json::to_value(build_tree(dir.path())).unwrap();
    assert_eq!(json[0]["type"], "file");
    assert_eq!(json[0]["path"], "a.txt");
}
#[cfg(unix)]
#[test]
fn test_tree_unreadable_directory_keeps_siblings() {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("hidden.txt"), "x").unwrap();
    fs::create_dir(dir.path().join("open")).unwrap();
    fs::write(dir.path().join("open/visible.txt"), "x").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    let unreadable = fs::read_dir(&locked).is_err();
    let tree = build_tree(dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert_eq!(names(&tree), vec!["locked", "open"]);
    assert_eq!(names(tree[1].children()), vec!["visible.txt"]);
    // Privileged users can still list a mode 000 directory.
    if unreadable {
        assert!(tree[0].children().is_empty());
    }
}
#[cfg(unix)]
#[test]
fn test_tree_omits_links_escaping_root() {
    use std::os::unix::fs::symlink;
    let outside = tempdir().unwrap();
    fs::write(outside.path().join("secret.txt"), "secret").unwrap();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("real.txt"), "real").unwrap();
    symlink(outside.path().join("secret.txt"), dir.path().join("escape.txt")).unwrap();
    symlink(dir.path().join("real.txt"), dir.path().join("alias.txt")).unwrap();
    symlink(dir.path(), dir.path().join("loop")).unwrap();
    let tree = build_tree(dir.path());
    assert_eq!(names(&tree), vec!["loop", "alias.txt", "real.txt"]);
    assert!(tree[0].children().is_empty());
}

#[test]
fn test_read_rejects_parent_traversal() {
    let outer = tempdir().unwrap();
    let root = outer.path().join("root");
    fs::create_dir(&root).unwrap();
    fs::write(outer.path().join("secret.txt"), "secret").unwrap();
    for rel in ["../secret.txt", "a/../../secret.txt", "../../../../etc/passwd", "../nope"] {
        let err = read_file(&root, rel).unwrap_err();
        assert!(matches!(err, ProjviewError::InvalidPath(_)), "{rel}: {err}");
    }
}
#[test]
fn test_read_rejects_sibling_with_shared_prefix() {
    let outer = tempdir().unwrap();
    let root = outer.path().join("root");
    let evil = outer.path().join("root-evil");
    fs::create_dir(&root).unwrap();
    fs::create_dir(&evil).unwrap();
    fs::write(evil.join("f.txt"), "evil").unwrap();
    let err = read_file(&root, "../root-evil/f.txt").unwrap_err();
    assert!(matches!(err, ProjviewError::InvalidPath(_)));
}
#[test]
fn test_read_rejects_absolute_path_outside_root() {
    let outer = tempdir().unwrap();
    let root = outer.path().join("root");
    fs::create_dir(&root).unwrap();
    let secret = outer.path().join("secret.txt");
    fs::write(&secret, "secret").unwrap();
    let err = read_file(&root, &secret).unwrap_err();
    assert!(matches!(err, ProjviewError::InvalidPath(_)));
}
#[cfg(unix)]
#[test]
fn test_read_rejects_symlink_escape() {
    use std::os::unix::fs::symlink;
    let outside = tempdir().unwrap();
    fs::write(outside.path().join("secret.txt"), "secret").unwrap();
    let dir = tempdir().unwrap();
    symlink(outside.path(), dir.path().join("out")).unwrap();
    let err = read_file(dir.path(), "out/secret.txt").unwrap_err();
    assert!(matches!(err, ProjviewError::InvalidPath(_)));
}
#[cfg(unix)]
#[test]
fn test_read_missing_file_behind_escaping_link_is_invalid() {
    use std::os::unix::fs::symlink;
    let outside = tempdir().unwrap();
    fs::write(outside.path().join("present.txt"), "secret").unwrap();
    let dir = tempdir().unwrap();
    symlink(outside.path(), dir.path().join("link")).unwrap();
    for rel in ["link/present.txt", "link/absent.txt", "link/deeper/absent.txt"] {
        let err = read_file(dir.path(), rel).unwrap_err();
        assert!(matches!(err, ProjviewError::InvalidPath(_)), "{rel}: {err}");
    }
    assert!(matches!(
        read_file(dir.path(), "absent/deeper.txt").unwrap_err(),
        ProjviewError::NotFound(_)
    ));
}
#[test]
fn test_read_allows_dot_segments_inside_root() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("a.txt"), "inside").unwrap();
    let file = read_file(dir.path(), "sub/../././a.txt").unwrap();
    assert_eq!(file.content, "inside");
    assert_eq!(file.render_kind, RenderKind::Text);
    assert_eq!(file.language_hint, None);
}
#[test]
fn test_read_not_found() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    assert!(matches!(
        read_file(dir.path(), "missing.txt").unwrap_err(),
        ProjviewError::NotFound(_)
    ));
    assert!(matches!(
        read_file(dir.path(), "sub").unwrap_err(),
        ProjviewError::NotFound(_)
    ));
    assert!(matches!(
        read_file(dir.path().join("gone"), "a.txt").unwrap_err(),
        ProjviewError::NotFound(_)
    ));
}
#[test]
fn test_read_size_limit_is_inclusive() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("fits.txt"), "A".repeat(10)).unwrap();
    fs::write(dir.path().join("over.txt"), "A".repeat(11)).unwrap();
    let reader = FileReader::new(ReaderBuilder::new().max_file_size(10).build());
    assert_eq!(reader.read_file(dir.path(), "fits.txt").unwrap().size, 10);
    match reader.read_file(dir.path(), "over.txt").unwrap_err() {
        ProjviewError::TooLarge { size, limit } => {
            assert_eq!(size, 11);
            assert_eq!(limit, 10);
        }
        other => panic!("unexpected error: {other}"),
    }
}
#[test]
fn test_read_default_ceiling() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("max.txt"), vec![b'a'; 1_000_000]).unwrap();
    fs::write(dir.path().join("big.txt"), vec![b'a'; 1_000_001]).unwrap();
    assert!(read_file(dir.path(), "max.txt").is_ok());
    assert!(matches!(
        read_file(dir.path(), "big.txt").unwrap_err(),
        ProjviewError::TooLarge { .. }
    ));
}
#[cfg(target_os = "linux")]
#[test]
fn test_read_limit_holds_when_content_exceeds_reported_size() {
    // procfs reports a size of 0 for files that yield content when read.
    let status = fs::metadata("/proc/self/status").unwrap();
    assert_eq!(status.len(), 0);
    let reader = FileReader::new(ReaderBuilder::new().max_file_size(10).build());
    match reader.read_file("/proc/self", "status").unwrap_err() {
        ProjviewError::TooLarge { size, limit } => {
            assert_eq!(limit, 10);
            assert_eq!(size, 11);
        }
        other => panic!("unexpected error: {other}"),
    }
}
#[test]
fn test_read_latin1_fallback() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("legacy.txt"), [b'c', b'a', b'f', 0xE9]).unwrap();
    let file = read_file(dir.path(), "legacy.txt").unwrap();
    assert_eq!(file.content, "café");
    assert!(file.decode_fallback_used);
}
#[test]
fn test_read_strips_utf8_bom() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bom.txt"), b"\xEF\xBB\xBFhello").unwrap();
    let file = read_file(dir.path(), "bom.txt").unwrap();
    assert_eq!(file.content, "hello");
    assert!(!file.decode_fallback_used);
}
#[test]
fn test_read_markdown_renders_html() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("README.md"), "# Title\n\nSome *text*.\n").unwrap();
    let file = read_file(dir.path(), "README.md").unwrap();
    assert_eq!(file.render_kind, RenderKind::Markdown);
    assert!(file.content.contains("<h1>Title</h1>"));
    assert!(file.content.contains("<em>text</em>"));
    assert!(!file.content.contains("# "));
}
#[test]
fn test_read_markdown_fallback_wraps_raw_text() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.markdown"), "# A <b> & c").unwrap();
    let reader = FileReader::with_renderer(Default::default(), FailingRenderer);
    let file = reader.read_file(dir.path(), "notes.markdown").unwrap();
    assert_eq!(file.render_kind, RenderKind::Markdown);
    assert_eq!(file.content, "<pre># A &lt;b&gt; &amp; c</pre>");
}
#[test]
fn test_read_code_language_hints() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
    fs::write(dir.path().join("App.PY"), "print(1)").unwrap();
    fs::write(dir.path().join("build.gradle"), "apply plugin").unwrap();
    let file = read_file(dir.path(), "main.rs").unwrap();
    assert_eq!(file.render_kind, RenderKind::Code);
    assert_eq!(file.language_hint.as_deref(), Some("rust"));
    assert_eq!(file.content, "fn main() {}");
    let file = read_file(dir.path(), "App.PY").unwrap();
    assert_eq!(file.language_hint.as_deref(), Some("python"));
    assert_eq!(
        read_file(dir.path(), "build.gradle").unwrap().render_kind,
        RenderKind::Text
    );
    let reader = FileReader::new(
        ReaderBuilder::new()
            .code_extensions(vec![".gradle".into(), "rs".into()])
            .build(),
    );
    let file = reader.read_file(dir.path(), "build.gradle").unwrap();
    assert_eq!(file.render_kind, RenderKind::Code);
    assert_eq!(file.language_hint.as_deref(), Some(projview::PLAIN_LANGUAGE));
}
#[test]
fn test_every_listed_file_is_readable() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("pkg/Sub Dir")).unwrap();
    fs::write(dir.path().join("pkg/Sub Dir/notes.txt"), "n").unwrap();
    fs::write(dir.path().join("pkg/index.js"), "1").unwrap();
    fs::write(dir.path().join("README.md"), "# r").unwrap();
    fs::write(dir.path().join("data.bin"), [0xFF, 0x00, 0x10]).unwrap();
    let mut paths = Vec::new();
    collect_file_paths(&build_tree(dir.path()), &mut paths);
    assert_eq!(paths.len(), 4);
    for path in paths {
        let result = read_file(dir.path(), Path::new(&path));
        assert!(result.is_ok(), "{path}: {:?}", result.err());
    }
}
