//! Behavioural properties of the namespace, driven through the public API.

use std::collections::BTreeSet;

use proptest::prelude::*;
use treefs_core::vfs::SiblingList;
use treefs_core::{
    DepthPolicy, Namespace, NamespaceConfig, NodeKind, RmdirPolicy, SharedNamespace, VfsError,
    VfsOps,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("treefs_core=debug")
        .with_test_writer()
        .try_init();
}

fn strictly_ascending(names: &[String]) -> bool {
    names.windows(2).all(|pair| pair[0] < pair[1])
}

// ============================================================================
// Sibling ordering and uniqueness
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Create(String),
    Mkdir(String),
    Remove(String),
}

fn name() -> impl Strategy<Value = String> {
    "[a-dA-D0-9_.]{1,3}".prop_filter("dot entries are reserved", |name| name != "." && name != "..")
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        name().prop_map(Op::Create),
        name().prop_map(Op::Mkdir),
        name().prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn children_stay_sorted_and_unique(ops in prop::collection::vec(op(), 1..64)) {
        let mut ns = Namespace::new();
        let mut model = BTreeSet::new();

        for op in ops {
            let before = ns.list("/").unwrap();
            match &op {
                Op::Create(name) | Op::Mkdir(name) => {
                    let path = format!("/{name}");
                    let result = match &op {
                        Op::Create(_) => ns.create_file(&path),
                        _ => ns.make_directory(&path),
                    };
                    if model.insert(name.clone()) {
                        prop_assert!(result.is_ok());
                    } else {
                        prop_assert!(matches!(result, Err(VfsError::AlreadyExists(_))));
                        prop_assert_eq!(ns.list("/").unwrap(), before);
                    }
                }
                Op::Remove(name) => {
                    let path = format!("/{name}");
                    let result = match ns.stat(&path).map(|attr| attr.kind) {
                        Ok(NodeKind::File) => ns.unlink(&path),
                        Ok(NodeKind::Directory) => ns.remove_directory(&path),
                        Err(e) => Err(e),
                    };
                    if model.remove(name) {
                        prop_assert!(result.is_ok());
                    } else {
                        prop_assert!(matches!(result, Err(VfsError::NotFound(_))));
                        prop_assert_eq!(ns.list("/").unwrap(), before);
                    }
                }
            }

            let listed = ns.list("/").unwrap();
            prop_assert!(strictly_ascending(&listed));
            prop_assert_eq!(listed, model.iter().cloned().collect::<Vec<_>>());
            prop_assert_eq!(ns.node_count(), model.len() + 1);
        }
    }

    #[test]
    fn sibling_list_matches_sorted_set(names in prop::collection::vec(name(), 0..48)) {
        let mut list = SiblingList::new();
        let root = Namespace::new().root();
        let mut model = BTreeSet::new();

        for name in &names {
            let inserted = list.insert(name.clone(), root);
            prop_assert_eq!(inserted.is_ok(), model.insert(name.clone()));
        }
        let listed: Vec<String> = list.names().map(String::from).collect();
        prop_assert!(strictly_ascending(&listed));
        prop_assert_eq!(listed.len(), list.len());
    }

    #[test]
    fn appends_accumulate_regardless_of_offset(
        chunks in prop::collection::vec((prop::collection::vec(any::<u8>(), 0..16), any::<u64>()), 0..16)
    ) {
        let mut ns = Namespace::new();
        ns.make_directory("/d").unwrap();
        let mut expected = Vec::new();

        for (chunk, offset) in &chunks {
            prop_assert_eq!(ns.write("/d/f", chunk, *offset).unwrap(), chunk.len());
            expected.extend_from_slice(chunk);
        }
        if chunks.is_empty() {
            prop_assert!(!ns.exists("/d/f"));
        } else {
            prop_assert_eq!(ns.read_all("/d/f").unwrap(), expected);
        }
    }

    #[test]
    fn read_window_is_clamped(len in 0usize..32, size in 0usize..64, offset in 0u64..64) {
        let mut ns = Namespace::new();
        ns.make_directory("/d").unwrap();
        let data: Vec<u8> = (0..len as u8).collect();
        ns.write("/d/f", &data, 0).unwrap();

        let got = ns.read("/d/f", size, offset).unwrap();
        let start = (offset as usize).min(len);
        let end = (start + size).min(len);
        prop_assert_eq!(got, data[start..end].to_vec());
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn create_stat_write_read_round_trip() {
    init_tracing();
    let mut ns = Namespace::new();
    ns.make_directory("/d").unwrap();
    ns.create_file("/d/f").unwrap();

    let attr = ns.stat("/d/f").unwrap();
    assert_eq!(attr.kind, NodeKind::File);
    assert_eq!(attr.size, 0);

    ns.write("/d/f", b"ab", 0).unwrap();
    assert_eq!(ns.read("/d/f", 2, 0).unwrap(), b"ab");
}

#[test]
fn hello_world_appends() {
    let mut ns = Namespace::new();
    ns.make_directory("/d").unwrap();
    ns.write("/d/f", b"hello", 0).unwrap();
    ns.write("/d/f", b"world", 17).unwrap();
    assert_eq!(ns.read_all("/d/f").unwrap(), b"helloworld");
}

#[test]
fn read_truncation() {
    let mut ns = Namespace::new();
    ns.make_directory("/d").unwrap();
    ns.write("/d/five", b"abcde", 0).unwrap();

    assert_eq!(ns.read("/d/five", 100, 3).unwrap(), b"de");
    assert_eq!(ns.read("/d/five", 10, 10).unwrap().len(), 0);
}

#[test]
fn removal_detaches_from_parent() {
    let mut ns = Namespace::new();
    ns.make_directory("/d").unwrap();
    ns.create_file("/d/a").unwrap();
    ns.create_file("/d/b").unwrap();

    ns.unlink("/d/a").unwrap();
    assert_eq!(ns.list("/d").unwrap(), vec!["b"]);
    assert!(!ns.exists("/d/a"));

    let before = ns.list("/d").unwrap();
    assert!(matches!(ns.unlink("/d/zzz"), Err(VfsError::NotFound(_))));
    assert_eq!(ns.list("/d").unwrap(), before);
}

#[test]
fn directory_restriction() {
    let mut ns = Namespace::new();
    ns.make_directory("/x").unwrap();
    assert!(matches!(ns.make_directory("/x/b"), Err(VfsError::PermissionDenied(_))));
    assert!(matches!(ns.make_directory("/a/b"), Err(VfsError::PermissionDenied(_))));
}

#[test]
fn uniform_policy_is_opt_in() {
    let config = NamespaceConfig::from_toml_str(
        r#"
        depth_policy = "uniform"
        rmdir_policy = "cascade"
        "#,
    )
    .unwrap();
    let mut ns = Namespace::with_config(config);
    ns.make_directory("/x").unwrap();
    ns.make_directory("/x/y").unwrap();
    ns.make_directory("/x/y/z").unwrap();
    ns.write("/x/y/z/log", b"deep", 0).unwrap();

    assert_eq!(ns.config().depth_policy, DepthPolicy::Uniform);
    assert_eq!(ns.config().rmdir_policy, RmdirPolicy::Cascade);
    ns.remove_directory("/x").unwrap();
    assert_eq!(ns.node_count(), 1);
}

#[test]
fn failed_operations_leave_tree_untouched() {
    let mut ns = Namespace::new();
    ns.make_directory("/d").unwrap();
    ns.write("/d/f", b"data", 0).unwrap();
    let snapshot = (ns.list("/").unwrap(), ns.list("/d").unwrap(), ns.node_count());

    let failures = [
        ns.make_directory("/d").map(|_| ()),
        ns.make_directory("/d/e").map(|_| ()),
        ns.create_file("/d/f").map(|_| ()),
        ns.create_file("/d/f/g").map(|_| ()),
        ns.write("/d/f/g", b"x", 0).map(|_| ()),
        ns.write("/nope/f", b"x", 0).map(|_| ()),
        ns.unlink("/d"),
        ns.remove_directory("/d"),
        ns.remove_directory("/d/f"),
        ns.post("/d/nobody", b"x").map(|_| ()),
    ];
    for result in failures {
        assert!(result.is_err());
    }

    assert_eq!(
        (ns.list("/").unwrap(), ns.list("/d").unwrap(), ns.node_count()),
        snapshot
    );
    assert_eq!(ns.read_all("/d/f").unwrap(), b"data");
}

#[test]
fn chat_between_users() {
    let fs = SharedNamespace::default();
    for user in ["/alice", "/bob", "/carol"] {
        fs.mkdir(user).unwrap();
    }

    fs.post("/alice/bob", b"lunch?\n").unwrap();
    fs.post("/carol/bob", b"meeting at 3\n").unwrap();
    fs.post("/alice/bob", b"noon works\n").unwrap();

    let inbox: Vec<_> = fs
        .readdir("/bob")
        .unwrap()
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    assert_eq!(inbox, vec![".", "..", "alice", "carol"]);
    assert_eq!(fs.read_all("/bob/alice").unwrap(), b"lunch?\nnoon works\n");
    assert!(!fs.exists("/alice/bob"));
}

#[test]
fn dot_entries_are_never_duplicated() {
    let fs = SharedNamespace::default();
    fs.mkdir("/d").unwrap();

    assert!(fs.create("/..").is_err());
    assert!(fs.mkdir("/d/.").is_err());
    assert!(fs.write("/d/..", b"x", 0).is_err());

    for dir in ["/", "/d"] {
        let names: Vec<_> = fs.readdir(dir).unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names.iter().filter(|n| *n == "..").count(), 1);
        assert_eq!(names.iter().filter(|n| *n == ".").count(), 1);
    }
    assert!(fs.getattr("/..").is_err());
}

#[test]
fn errno_values_for_adapters() {
    let mut ns = Namespace::new();
    let err = ns.make_directory("/a/b").unwrap_err();
    assert_eq!(err.errno(), treefs_core::vfs::errno::EPERM);
    let err = ns.read("/missing", 1, 0).unwrap_err();
    assert_eq!(err.errno(), treefs_core::vfs::errno::ENOENT);
}
