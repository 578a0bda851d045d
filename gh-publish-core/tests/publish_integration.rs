// Integration test for the REST API path.
// Builds a small project tree on disk, runs publish_project against a mocked
// contents API and checks what would have been written.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use gh_publish_core::config::{Credentials, PublishConfig, Secret};
use gh_publish_core::console::Console;
use gh_publish_core::contract::{
    ApiError, MockContentsApi, PutContentRequest, RemoteFile, RepositoryCreation,
};
use gh_publish_core::github::{decode_content, publish_project, PublishOptions, UploadStatus};

fn write(root: &Path, rel: &str, bytes: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

#[tokio::test]
async fn publishes_kept_files_and_reports_partial_failure() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "README.md", b"# demo\n");
    write(root, "src/app.py", b"print('hi')\n");
    write(root, "assets/logo.png", &[0x89, b'P', b'N', b'G', 0, 0, 0xff]);
    write(root, "broken.txt", b"will fail");
    write(root, "node_modules/pkg/index.js", b"ignored");
    write(root, ".env", b"SECRET=1");
    write(root, "server.log", b"ignored");

    let config = PublishConfig::new(
        Credentials {
            token: Secret::new("ghp_integration"),
            owner: "octocat".into(),
            repo: "demo".into(),
        },
        root,
    );

    let writes: Arc<Mutex<HashMap<String, PutContentRequest>>> = Arc::default();
    let captured = Arc::clone(&writes);

    let mut api = MockContentsApi::new();
    api.expect_create_repository()
        .times(1)
        .returning(|_| Ok(RepositoryCreation::AlreadyExists));
    api.expect_get_file().returning(|path, _| match path {
        "README.md" => Ok(Some(RemoteFile {
            sha: "95d09f2b10159347eece71399a7e2e907ea3df4f".into(),
        })),
        _ => Ok(None),
    });
    api.expect_put_file().returning(move |path, req| {
        if path == "broken.txt" {
            return Err(ApiError::Status {
                url: format!("contents/{path}"),
                status: 422,
                body: "Invalid request".into(),
            });
        }
        captured.lock().unwrap().insert(path.to_string(), req);
        Ok(())
    });

    let report = publish_project(&api, &config, PublishOptions::default(), Console::quiet())
        .await
        .unwrap();

    let paths: Vec<&str> = report.outcomes.iter().map(|o| o.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["README.md", "assets/logo.png", "broken.txt", "src/app.py"]
    );
    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.outcomes[0].status, UploadStatus::Updated);
    assert_eq!(report.outcomes[1].status, UploadStatus::Created);
    assert!(matches!(report.outcomes[2].status, UploadStatus::Failed(_)));
    assert!(report.is_success());

    let writes = writes.lock().unwrap();
    assert_eq!(
        writes["README.md"].sha.as_deref(),
        Some("95d09f2b10159347eece71399a7e2e907ea3df4f")
    );
    assert!(writes["src/app.py"].sha.is_none());
    assert_eq!(
        decode_content(&writes["assets/logo.png"].content).unwrap(),
        vec![0x89, b'P', b'N', b'G', 0, 0, 0xff]
    );
    assert!(writes.values().all(|w| w.branch == "main"));
}

#[tokio::test]
async fn every_upload_failing_is_not_a_success() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", b"a");
    write(dir.path(), "b.txt", b"b");

    let config = PublishConfig::new(
        Credentials {
            token: Secret::new("t"),
            owner: "o".into(),
            repo: "r".into(),
        },
        dir.path(),
    );

    let mut api = MockContentsApi::new();
    api.expect_get_file().returning(|path, _| {
        Err(ApiError::Transport {
            url: path.to_string(),
            message: "connection reset".into(),
        })
    });
    api.expect_put_file().never();

    let report = publish_project(
        &api,
        &config,
        PublishOptions {
            create_repository: false,
        },
        Console::quiet(),
    )
    .await
    .unwrap();
    assert_eq!(report.total(), 2);
    assert_eq!(report.succeeded(), 0);
    assert!(!report.is_success());
}
