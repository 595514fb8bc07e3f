//! Build and erase against a real project directory

use blueprint::{Blueprint, BlueprintError, Config, DiskFilesystem, Filesystem, GenerateOptions};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_build_then_erase_on_disk() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("draft.yaml"),
        "models:\n  Post:\n    title: string\ncontrollers:\n  Post:\n    resource: web\n",
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("routes")).unwrap();
    fs::write(dir.path().join("routes/web.php"), "<?php\n").unwrap();

    let blueprint = Blueprint::new(Config::default());
    let mut disk = DiskFilesystem::new(dir.path());

    let built = blueprint
        .execute(&mut disk, "draft.yaml", &[], &[], &GenerateOptions::default())
        .unwrap();
    assert!(dir.path().join("app/Models/Post.php").exists());
    assert!(dir.path().join("app/Http/Controllers/PostController.php").exists());
    assert_eq!(built.updated, vec!["routes/web.php"]);

    let routes = fs::read_to_string(dir.path().join("routes/web.php")).unwrap();
    assert!(routes.contains("Route::resource('posts', App\\Http\\Controllers\\PostController::class);"));

    let ledger = fs::read_to_string(dir.path().join(".blueprint")).unwrap();
    assert!(ledger.contains("app/Models/Post.php"));

    let erased = blueprint.erase(&mut disk).unwrap();
    assert_eq!(erased.deleted, built.created);
    assert!(!dir.path().join("app/Models/Post.php").exists());
    assert!(dir.path().join("routes/web.php").exists());
    assert!(disk.exists(".blueprint"));
}

#[test]
fn test_published_stub_overrides_builtin() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("stubs")).unwrap();
    fs::write(dir.path().join("stubs/view.stub"), "<div>{{ view }}</div>\n").unwrap();
    fs::write(
        dir.path().join("draft.yaml"),
        "controllers:\n  Post:\n    index:\n      render: post.index\n",
    )
    .unwrap();

    let blueprint = Blueprint::new(Config::default());
    let mut disk = DiskFilesystem::new(dir.path());
    let only = vec!["views".to_string()];
    blueprint
        .execute(&mut disk, "draft.yaml", &only, &[], &GenerateOptions::default())
        .unwrap();

    let view = fs::read_to_string(dir.path().join("resources/views/post/index.blade.php")).unwrap();
    assert_eq!(view, "<div>post.index</div>\n");
}

#[test]
fn test_missing_draft_on_disk() {
    let dir = TempDir::new().unwrap();
    let blueprint = Blueprint::new(Config::default());
    let mut disk = DiskFilesystem::new(dir.path());

    let err = blueprint
        .execute(&mut disk, "draft.yaml", &[], &[], &GenerateOptions::default())
        .unwrap_err();
    assert!(matches!(err, BlueprintError::MissingDraft(_)));
}
