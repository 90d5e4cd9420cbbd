//! Locator Operations Benchmarks
//!
//! Benchmarks for hierarchy path parsing, wildcard resolution over generated
//! widget trees, and user-tag search.
//!
//! Run with: `cargo bench --bench locator_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qxprobe::prelude::*;
use serde_json::{json, Map, Value as Json};

/// Complete tree of the given depth and fan-out. Leaves are buttons labelled
/// with their id; the last leaf carries the user tag `target`.
fn generate_tree(depth: u32, fanout: u32) -> WidgetSnapshot {
    let mut nodes = Map::new();
    let mut last_leaf = String::new();
    build(&mut nodes, "n", depth, fanout, &mut last_leaf);
    if let Some(Json::Object(leaf)) = nodes.get_mut(&last_leaf) {
        leaf.insert("userData".to_string(), json!({"target": true}));
    }
    WidgetSnapshot::from_json_value(json!({
        "application": "n",
        "clientDocument": "n",
        "classes": {
            "qx.ui.container.Composite": {},
            "qx.ui.form.Button": {"properties": ["label"]}
        },
        "nodes": nodes
    }))
    .unwrap()
}

fn build(nodes: &mut Map<String, Json>, id: &str, depth: u32, fanout: u32, last: &mut String) {
    if depth == 0 {
        nodes.insert(
            id.to_string(),
            json!({"class": "qx.ui.form.Button", "element": id, "properties": {"label": id}}),
        );
        *last = id.to_string();
        return;
    }
    let children: Vec<String> = (0..fanout).map(|i| format!("{id}.{i}")).collect();
    nodes.insert(
        id.to_string(),
        json!({
            "class": "qx.ui.container.Composite",
            "children": children.iter().map(|c| json!({"$ref": c})).collect::<Vec<_>>()
        }),
    );
    for child in &children {
        build(nodes, child, depth - 1, fanout, last);
    }
}

fn bench_path_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_parsing");

    let paths = vec![
        ("member_chain", "toolbar/file/open"),
        ("class", "qx.ui.form.Button"),
        ("indexed", "child[0]/child[2]/child[1]"),
        ("attribute", "*/[@label=\"Save.*\"]"),
        ("mixed", "main/*/qx.ui.toolbar.ToolBar/child[3]/[@label=Quit]"),
    ];

    for (name, path) in paths {
        group.bench_with_input(BenchmarkId::from_parameter(name), &path, |bench, p| {
            bench.iter(|| {
                let parsed = Path::parse(black_box(p)).unwrap();
                black_box(parsed);
            });
        });
    }

    group.finish();
}

fn bench_wildcard_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("wildcard_resolution");

    for (depth, fanout) in [(3, 4), (4, 4), (5, 3)] {
        let tree = generate_tree(depth, fanout);
        let root = tree.node("n").unwrap();
        let last_label = tree.id_of(tree.node(&last_leaf_id(depth, fanout)).unwrap());
        let path = Path::parse(&format!("*/[@label=^{}$]", regex_escape(last_label))).unwrap();
        let context = ResolveContext::new(&tree).with_registry(tree.type_registry());

        group.bench_with_input(
            BenchmarkId::new("last_leaf", format!("d{depth}_f{fanout}")),
            &path,
            |bench, path| {
                bench.iter(|| {
                    let found = context.resolve(black_box(&root), path).unwrap();
                    black_box(found);
                });
            },
        );
    }

    group.finish();
}

fn bench_tag_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("tag_search");

    for (depth, fanout) in [(3, 4), (5, 3)] {
        let tree = generate_tree(depth, fanout);
        let dispatcher = Dispatcher::new(&tree);

        group.bench_function(format!("d{depth}_f{fanout}"), |bench| {
            bench.iter(|| {
                let element = dispatcher.find_element(black_box("qx=target")).unwrap();
                black_box(element);
            });
        });
    }

    group.finish();
}

fn last_leaf_id(depth: u32, fanout: u32) -> String {
    let mut id = "n".to_string();
    for _ in 0..depth {
        id.push_str(&format!(".{}", fanout - 1));
    }
    id
}

fn regex_escape(text: &str) -> String {
    text.replace('.', "\\.")
}

criterion_group!(
    benches,
    bench_path_parsing,
    bench_wildcard_resolution,
    bench_tag_search
);
criterion_main!(benches);
