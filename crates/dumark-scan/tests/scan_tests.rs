use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use dumark_scan::{
    DirReader, EntryInfo, MEGABYTE, ReadError, ScanConfig, ScanError, UsageTree, Walker,
    prepare_root, process, scan,
};
use tempfile::TempDir;

fn memory_reader(listings: Vec<(&str, Vec<EntryInfo>)>) -> impl DirReader {
    let listings: HashMap<PathBuf, Vec<EntryInfo>> = listings
        .into_iter()
        .map(|(path, entries)| (PathBuf::from(path), entries))
        .collect();
    move |path: &Path| {
        listings
            .get(path)
            .cloned()
            .ok_or_else(|| ReadError::new(path, std::io::ErrorKind::NotFound.into()))
    }
}

fn assert_aggregated(tree: &UsageTree) {
    for id in tree.ids() {
        let node = &tree[id];
        if node.is_dir() {
            let visible: u64 = node.children.iter().map(|&c| tree[c].size).sum();
            assert!(visible <= node.size, "{} lists more than it holds", node.display_name());
        }
    }
}

#[test]
fn test_walk_then_process_prunes_small_entries() {
    let reader = memory_reader(vec![
        (
            "/root",
            vec![EntryInfo::file("a.txt", 5_000_000), EntryInfo::dir("sub")],
        ),
        ("/root/sub", vec![EntryInfo::file("b.txt", 20_000_000)]),
    ]);

    let mut tree = Walker::new(reader).walk(Path::new("/root"));
    process(&mut tree, MEGABYTE * 10).unwrap();

    assert_eq!(tree.total_size(), 25_000_000);
    let listed: Vec<_> = tree
        .children(tree.root())
        .iter()
        .map(|&c| tree[c].name.to_str().unwrap())
        .collect();
    assert_eq!(listed, vec!["sub"]);

    let sub = tree.find_child(tree.root(), "sub").unwrap();
    assert_eq!(tree[sub].size, 20_000_000);
    assert_aggregated(&tree);
}

#[test]
fn test_limit_does_not_change_totals() {
    let listings = || {
        vec![
            (
                "/data",
                vec![
                    EntryInfo::dir("x"),
                    EntryInfo::file("tiny", 1),
                    EntryInfo::file("big", 4096),
                ],
            ),
            (
                "/data/x",
                vec![EntryInfo::file("one", 100), EntryInfo::file("two", 300)],
            ),
        ]
    };

    let mut totals = Vec::new();
    for limit in [0, 1, 200, 5000, u64::MAX] {
        let mut tree = Walker::new(memory_reader(listings())).walk(Path::new("/data"));
        process(&mut tree, limit).unwrap();
        totals.push(tree.total_size());
    }
    assert!(totals.iter().all(|&t| t == 4497));
}

#[test]
fn test_processed_children_are_ordered() {
    let reader = memory_reader(vec![(
        "/o",
        vec![
            EntryInfo::file("m", 10),
            EntryInfo::file("z", 50),
            EntryInfo::file("a", 10),
            EntryInfo::file("q", 70),
        ],
    )]);
    let mut tree = Walker::new(reader).walk(Path::new("/o"));
    process(&mut tree, 0).unwrap();

    let children = tree.children(tree.root());
    for pair in children.windows(2) {
        let (a, b) = (&tree[pair[0]], &tree[pair[1]]);
        assert!(a.size > b.size || (a.size == b.size && a.name < b.name));
    }
}

#[test]
fn test_real_filesystem_scan() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("logs/archive")).unwrap();
    fs::create_dir(root.join("node_modules")).unwrap();
    fs::write(root.join("readme"), vec![0u8; 10]).unwrap();
    fs::write(root.join("logs/today.log"), vec![0u8; 300]).unwrap();
    fs::write(root.join("logs/archive/old.log"), vec![0u8; 2000]).unwrap();
    fs::write(root.join("node_modules/pkg.js"), vec![0u8; 9999]).unwrap();

    let config = ScanConfig::builder()
        .root(root)
        .min_size(0u64)
        .ignore_names(["node_modules".to_string()].into_iter().collect::<std::collections::HashSet<_>>())
        .build()
        .unwrap();
    let tree = scan(&config).unwrap();

    assert_eq!(tree.total_size(), 2310);
    assert_eq!(tree.root_path, root);
    assert!(tree.find_child(tree.root(), "node_modules").is_none());

    let logs = tree.find_child(tree.root(), "logs").unwrap();
    assert_eq!(tree.children(tree.root())[0], logs);
    let archive = tree.find_child(logs, "archive").unwrap();
    let old = tree.find_child(archive, "old.log").unwrap();
    assert_eq!(tree.path_of(old), root.join("logs/archive/old.log"));
    assert_aggregated(&tree);
}

#[test]
fn test_prepare_root_rejects_files_and_missing_paths() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("plain");
    fs::write(&file, "x").unwrap();

    assert!(matches!(
        prepare_root(&file),
        Err(ScanError::NotADirectory { .. })
    ));
    assert!(matches!(
        prepare_root(&temp.path().join("missing")),
        Err(ScanError::NotFound { .. })
    ));
    assert!(prepare_root(temp.path()).is_ok());
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_names_are_walked_and_printed() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(OsStr::from_bytes(b"d\xfe"));
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("data"), vec![0u8; 5000]).unwrap();
    let file = temp.path().join(OsStr::from_bytes(b"bad\xffname"));
    fs::write(&file, vec![0u8; 300]).unwrap();

    let config = ScanConfig::builder().root(temp.path()).min_size(0u64).build().unwrap();
    let tree = scan(&config).unwrap();

    assert!(tree.warnings.is_empty());
    assert_eq!(tree.total_size(), 5300);

    let d = tree.find_child(tree.root(), OsStr::from_bytes(b"d\xfe")).unwrap();
    assert_eq!(tree[d].size, 5000);
    assert_eq!(tree.path_of(d), dir);

    let bad = tree.find_child(tree.root(), OsStr::from_bytes(b"bad\xffname")).unwrap();
    assert_eq!(tree.path_of(bad), file);
    assert!(tree.path_of(bad).exists());
}

#[cfg(unix)]
#[test]
fn test_symlinked_root_keeps_typed_path() {
    let temp = TempDir::new().unwrap();
    let real = temp.path().join("real");
    fs::create_dir(&real).unwrap();
    fs::write(real.join("blob"), vec![0u8; 42]).unwrap();
    let link = temp.path().join("link");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let config = ScanConfig::builder().root(&link).min_size(0u64).build().unwrap();
    let tree = scan(&config).unwrap();

    let blob = tree.find_child(tree.root(), "blob").unwrap();
    assert_eq!(tree.path_of(blob), link.join("blob"));
}
