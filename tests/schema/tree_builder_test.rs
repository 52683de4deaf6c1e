//! Merge and ordering properties of the schema tree builder.

use strata::schema::{SchemaNode, SchemaTreeBuilder};

fn build(source: &str, paths: &[&str]) -> Vec<SchemaNode> {
    let mut builder = SchemaTreeBuilder::new(source);
    for path in paths {
        builder.add_path(path).unwrap();
    }
    builder.build()
}

/// Walk the forest asserting the structural output guarantee: every node
/// is queryable or has children.
fn assert_no_dead_containers(nodes: &[SchemaNode]) {
    for node in nodes {
        assert!(
            node.queryable || !node.children.is_empty(),
            "node '{}' is a childless non-queryable container",
            node.path
        );
        assert_no_dead_containers(&node.children);
    }
}

#[test]
fn single_segment_path_is_idempotent() {
    let forest = build("conn1", &["table=audit_log", "table=audit_log", "table=audit_log"]);

    assert_eq!(forest.len(), 1);
    let root = &forest[0];
    assert!(root.queryable);
    assert!(root.children.is_empty());
    assert_eq!(root.name, "audit_log");
    assert_eq!(root.node_type, "table");
}

#[test]
fn shared_ancestors_merge_and_leaves_stay_distinct() {
    let forest = build(
        "conn1",
        &[
            "catalog=main/schema=dbo/table=c",
            "catalog=main/schema=dbo/table=d",
        ],
    );

    assert_eq!(forest.len(), 1);
    let catalog = &forest[0];
    assert_eq!(catalog.children.len(), 1);
    let schema = &catalog.children[0];
    let leaves: Vec<_> = schema.children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(leaves, ["c", "d"]);
}

#[test]
fn two_passes_over_the_same_paths_are_structurally_identical() {
    let paths = [
        "schema=public/table=customer",
        "table=standalone",
        "schema=public/table=orders",
        "schema=archive/table=customer",
    ];

    let first = build("conn1", &paths);
    let second = build("conn1", &paths);

    assert_eq!(first, second);
    // First-discovery order is preserved at the root.
    let roots: Vec<_> = first.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(roots, ["public", "standalone", "archive"]);
    assert_no_dead_containers(&first);
}

#[test]
fn sources_never_share_nodes_even_when_paths_collide() {
    let first = build("conn1", &["schema=public/table=customer"]);
    let second = build("conn2", &["schema=public/table=customer"]);

    // Structurally parallel, but every node is owned by its own source.
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_ne!(first, second);
    assert!(first[0].matches("conn1", "public", "schema"));
    assert!(!first[0].matches("conn2", "public", "schema"));
}

#[test]
fn matching_is_case_sensitive() {
    let forest = build("conn1", &["schema=Public/table=a", "schema=public/table=a"]);
    assert_eq!(forest.len(), 2);
}

#[test]
fn malformed_path_does_not_corrupt_the_pass() {
    let mut builder = SchemaTreeBuilder::new("conn1");
    builder.add_path("schema=public/table=customer").unwrap();

    let failures = builder.add_paths([
        "schema=public/orders",
        "schema=public/table=orders",
        "no_delimiter_at_all",
    ]);
    assert_eq!(failures.len(), 2);

    let forest = builder.build();
    assert_eq!(forest.len(), 1);
    let leaves: Vec<_> = forest[0].children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(leaves, ["customer", "orders"]);
}

#[test]
fn resubmitting_a_multi_segment_path_does_not_duplicate_the_leaf() {
    let forest = build(
        "conn1",
        &["schema=public/table=customer", "schema=public/table=customer"],
    );

    assert_eq!(forest[0].children.len(), 1);
    assert!(forest[0].children[0].queryable);
}

#[test]
fn connection_qualified_paths_build_the_full_chain() {
    let forest = build(
        "conn1",
        &[
            "connection=conn1/schema=public/table=customer",
            "connection=conn1/schema=public/table=orders",
        ],
    );

    assert_eq!(forest.len(), 1);
    let connection = &forest[0];
    assert_eq!(connection.node_type, "connection");
    assert_eq!(connection.path, "connection=conn1");
    assert!(!connection.queryable);

    assert_eq!(connection.children.len(), 1);
    let schema = &connection.children[0];
    assert_eq!(schema.name, "public");
    assert!(!schema.queryable);
    // A container's path stops at its own segment no matter how many
    // children arrive later.
    assert_eq!(schema.path, "connection=conn1/schema=public");

    let leaves: Vec<_> = schema
        .children
        .iter()
        .map(|n| (n.name.as_str(), n.queryable, n.path.as_str()))
        .collect();
    assert_eq!(
        leaves,
        [
            (
                "customer",
                true,
                "connection=conn1/schema=public/table=customer"
            ),
            (
                "orders",
                true,
                "connection=conn1/schema=public/table=orders"
            ),
        ]
    );
}

#[test]
fn container_later_named_as_leaf_becomes_queryable_in_place() {
    let forest = build("conn1", &["schema=public/table=customer", "schema=public"]);

    assert_eq!(forest.len(), 1);
    let public = &forest[0];
    assert!(public.queryable);
    assert_eq!(public.children.len(), 1);
}

#[test]
fn deep_mixed_forest_has_no_dead_containers() {
    let forest = build(
        "warehouse",
        &[
            "catalog=main/schema=dbo/table=fact_sales",
            "catalog=main/schema=dbo/table=dim_date",
            "catalog=main/schema=staging/table=raw_events",
            "catalog=archive/schema=dbo/table=fact_sales",
            "table=health_check",
        ],
    );

    assert_eq!(forest.len(), 3);
    assert_no_dead_containers(&forest);
}
