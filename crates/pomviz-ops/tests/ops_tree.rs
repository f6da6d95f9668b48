use std::fs;
use std::path::Path;

use pomviz_core::config::GraphConfig;
use pomviz_ops::ops_tree::{self, TreeOptions};
use tempfile::TempDir;

fn publish(repo: &Path, coord: &str, deps: &[&str]) {
    let parts: Vec<&str> = coord.split(':').collect();
    let (group, artifact, version) = (parts[0], parts[1], parts[2]);
    let dir = repo
        .join(group.replace('.', "/"))
        .join(artifact)
        .join(version);
    fs::create_dir_all(&dir).unwrap();
    let deps: String = deps
        .iter()
        .map(|d| {
            let p: Vec<&str> = d.split(':').collect();
            format!(
                "<dependency><groupId>{}</groupId><artifactId>{}</artifactId><version>{}</version></dependency>",
                p[0], p[1], p[2]
            )
        })
        .collect();
    fs::write(
        dir.join(format!("{artifact}-{version}.pom")),
        format!("<project><dependencies>{deps}</dependencies></project>"),
    )
    .unwrap();
}

fn sample_repo() -> TempDir {
    let repo = TempDir::new().unwrap();
    publish(repo.path(), "com.example:app:1.0", &["org.a:a:1", "org.b:b:1"]);
    publish(repo.path(), "org.a:a:1", &["org.c:c:1"]);
    publish(repo.path(), "org.b:b:1", &["org.c:c:1"]);
    publish(repo.path(), "org.c:c:1", &[]);
    repo
}

fn config(repo: &Path) -> GraphConfig {
    GraphConfig {
        repository_url: Some(format!("file://{}", repo.display())),
        package_name: Some("com.example:app:1.0".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_tree_output() {
    let repo = sample_repo();
    let out = ops_tree::tree(&config(repo.path()), &TreeOptions::default())
        .await
        .unwrap();
    assert_eq!(
        out,
        "com.example:app:1.0\n├── org.a:a:1\n│   └── org.c:c:1\n└── org.b:b:1\n    └── org.c:c:1\n"
    );
}

#[tokio::test]
async fn test_tree_depth_limit() {
    let repo = sample_repo();
    let opts = TreeOptions {
        depth: Some(1),
        ..Default::default()
    };
    let out = ops_tree::tree(&config(repo.path()), &opts).await.unwrap();
    assert!(out.contains("org.a:a:1"));
    assert!(!out.contains("org.c:c:1"));
}

#[tokio::test]
async fn test_tree_why() {
    let repo = sample_repo();
    let opts = TreeOptions {
        why: Some("c".to_string()),
        ..Default::default()
    };
    let out = ops_tree::tree(&config(repo.path()), &opts).await.unwrap();
    // either of the two equally short paths may be reported
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Path to c:");
    assert_eq!(lines[1], "com.example:app:1.0");
    assert!(lines[2] == "  org.a:a:1" || lines[2] == "  org.b:b:1");
    assert_eq!(lines[3], "    org.c:c:1");
}

#[tokio::test]
async fn test_tree_why_not_found() {
    let repo = sample_repo();
    let opts = TreeOptions {
        why: Some("nothing".to_string()),
        ..Default::default()
    };
    let out = ops_tree::tree(&config(repo.path()), &opts).await.unwrap();
    assert_eq!(out, "Dependency 'nothing' not found in the graph.\n");
}

#[tokio::test]
async fn test_tree_leaf_package_prints_root_only() {
    let repo = sample_repo();
    let mut cfg = config(repo.path());
    cfg.package_name = Some("org.c:c:1".to_string());
    let out = ops_tree::tree(&cfg, &TreeOptions::default()).await.unwrap();
    assert_eq!(out, "org.c:c:1\n");
}

#[tokio::test]
async fn test_tree_missing_root_fails() {
    let repo = sample_repo();
    let mut cfg = config(repo.path());
    cfg.package_name = Some("org.zzz:none:1".to_string());
    let err = ops_tree::tree(&cfg, &TreeOptions::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("org.zzz:none:1"));
}

#[tokio::test]
async fn test_tree_invalid_package_name() {
    let repo = sample_repo();
    let mut cfg = config(repo.path());
    cfg.package_name = Some("just-a-name".to_string());
    let err = ops_tree::tree(&cfg, &TreeOptions::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("expected 'groupId:artifactId:version'"));
}
