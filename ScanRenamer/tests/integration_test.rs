use scanrenamer::prelude::*;
use scanrenamer::pipeline::ScratchDisposition;
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, data) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
}

fn scan_archive(path: &Path) {
    write_zip(
        path,
        &[
            ("model.obj", b"# scan\nmtllib Model.mtl\nv 0 0 0\n".as_slice()),
            ("model.mtl", b"newmtl m\nmap_Kd Model.jpg\n".as_slice()),
            ("model.jpg", JPEG_BYTES),
            ("tex.png", PNG_BYTES),
        ],
    );
}

/// Temp workspace with `in/`, `out/` and a scratch root
struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("in")).unwrap();
        Self { temp }
    }

    fn input(&self, name: &str) -> PathBuf {
        self.temp.path().join("in").join(name)
    }

    fn out(&self) -> PathBuf {
        self.temp.path().join("out")
    }

    fn scratch(&self) -> PathBuf {
        self.temp.path().join("scratch")
    }

    fn config(&self) -> RenameConfig {
        RenameConfig {
            scratch_root: Some(self.scratch()),
            ..RenameConfig::default()
        }
    }

    fn output_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.out())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

#[test]
fn test_standard_scan_archive() {
    let ws = Workspace::new();
    let archive = ws.input("car.zip");
    scan_archive(&archive);

    let report = AssetPipeline::new(ws.config()).process_archive(&archive, &ws.out());

    assert!(report.is_success(), "{}", report.outcome);
    assert_eq!(report.base_name, "car");
    assert_eq!(report.entries_total, 4);
    assert_eq!(ws.output_names(), vec!["car.jpg", "car.mtl", "car.obj", "car.png"]);
    assert_eq!(
        fs::read_to_string(ws.out().join("car.obj")).unwrap(),
        "# scan\nmtllib car.mtl\nv 0 0 0\n"
    );
    assert_eq!(
        fs::read_to_string(ws.out().join("car.mtl")).unwrap(),
        "newmtl m\nmap_Kd car.jpg\n"
    );
    assert_eq!(fs::read(ws.out().join("car.jpg")).unwrap(), JPEG_BYTES);
    assert_eq!(fs::read(ws.out().join("car.png")).unwrap(), PNG_BYTES);

    // Source consumed, scratch gone
    assert!(report.source_deleted);
    assert!(!archive.exists());
    assert_eq!(report.scratch, ScratchDisposition::Removed);
    assert!(!ws.scratch().join("car").exists());
}

#[test]
fn test_broken_archive_does_not_stop_batch() {
    let ws = Workspace::new();
    let broken = ws.input("broken.zip");
    fs::write(&broken, b"this is not a zip file").unwrap();
    scan_archive(&ws.input("car.zip"));

    let archives = find_archive_files(ws.temp.path().join("in")).unwrap();
    let result = process_batch(&archives, &ws.out(), &ws.config(), |_| {}).unwrap();

    assert_eq!(result.status(), "Done");
    assert_eq!(result.success_count, 1);
    assert_eq!(result.fail_count, 1);

    let failed = &result.reports[0];
    assert_eq!(failed.base_name, "broken");
    assert_eq!(failed.outcome.stage(), Some(JobStage::Extract));
    assert!(!failed.source_deleted);
    assert!(broken.exists());
    assert_eq!(failed.scratch, ScratchDisposition::Removed);
    assert!(!ws.scratch().join("broken").exists());

    assert!(result.reports[1].is_success());
    assert!(ws.output_names().iter().all(|n| !n.starts_with("broken")));
    assert_eq!(ws.output_names(), vec!["car.jpg", "car.mtl", "car.obj", "car.png"]);
}

#[test]
fn test_output_collision_keeps_earlier_moves() {
    let ws = Workspace::new();
    let archive = ws.input("car.zip");
    write_zip(
        &archive,
        &[
            ("model.obj", b"mtllib Model.mtl\n".as_slice()),
            ("model.mtl", b"map_Kd Model.jpg\n".as_slice()),
            ("tex.png", PNG_BYTES),
        ],
    );
    fs::create_dir(ws.out()).unwrap();
    fs::write(ws.out().join("car.png"), b"already here").unwrap();

    let report = AssetPipeline::new(ws.config()).process_archive(&archive, &ws.out());

    assert_eq!(report.outcome.stage(), Some(JobStage::Move));
    assert_eq!(report.moved, vec![ws.out().join("car.mtl"), ws.out().join("car.obj")]);
    assert_eq!(fs::read(ws.out().join("car.png")).unwrap(), b"already here");
    assert_eq!(
        fs::read_to_string(ws.out().join("car.obj")).unwrap(),
        "mtllib car.mtl\n"
    );
    assert!(!ws.scratch().join("car").exists());
}

#[test]
fn test_renaming_is_deterministic() {
    let first = Workspace::new();
    let second = Workspace::new();
    scan_archive(&first.input("car.zip"));
    scan_archive(&second.input("car.zip"));

    let a = AssetPipeline::new(first.config()).process_archive(&first.input("car.zip"), &first.out());
    let b = AssetPipeline::new(second.config()).process_archive(&second.input("car.zip"), &second.out());

    assert!(a.is_success() && b.is_success());
    assert_eq!(first.output_names(), second.output_names());
    for name in first.output_names() {
        assert_eq!(
            fs::read(first.out().join(&name)).unwrap(),
            fs::read(second.out().join(&name)).unwrap()
        );
    }
}

#[test]
fn test_keep_scratch_on_failure() {
    let ws = Workspace::new();
    let broken = ws.input("broken.zip");
    fs::write(&broken, b"PK but not really").unwrap();
    let config = RenameConfig {
        keep_scratch_on_failure: true,
        ..ws.config()
    };

    let report = AssetPipeline::new(config).process_archive(&broken, &ws.out());

    assert_eq!(report.outcome.stage(), Some(JobStage::Extract));
    assert_eq!(
        report.scratch,
        ScratchDisposition::Retained { path: ws.scratch().join("broken") }
    );
    assert!(ws.scratch().join("broken").is_dir());
}

#[test]
fn test_keep_source_and_extension_kinds() {
    let ws = Workspace::new();
    let archive = ws.input("chair.zip");
    write_zip(
        &archive,
        &[
            ("scan.obj", b"mtllib Model.mtl\n".as_slice()),
            ("diffuse.jpeg", JPEG_BYTES),
        ],
    );
    let config = RenameConfig {
        delete_source: false,
        kind_token: KindTokenRule::Extension,
        ..ws.config()
    };

    let report = AssetPipeline::new(config).process_archive(&archive, &ws.out());

    assert!(report.is_success());
    assert!(archive.exists());
    assert!(!report.source_deleted);
    assert_eq!(ws.output_names(), vec!["chair.jpeg", "chair.obj"]);
}

#[test]
fn test_fixed_width_kind_token() {
    let ws = Workspace::new();
    let archive = ws.input("chair.zip");
    write_zip(&archive, &[("diffuse.jpeg", JPEG_BYTES), ("a", b"x".as_slice())]);

    let report = AssetPipeline::new(ws.config()).process_archive(&archive, &ws.out());

    assert!(report.is_success());
    assert_eq!(ws.output_names(), vec!["chaira", "chairjpeg"]);
}

#[test]
fn test_nested_entries_are_flattened() {
    let ws = Workspace::new();
    let archive = ws.input("lamp.zip");
    write_zip(
        &archive,
        &[
            ("lamp/model.obj", b"mtllib Model.mtl\n".as_slice()),
            ("lamp/textures/model.jpg", JPEG_BYTES),
        ],
    );

    let plan = plan_archive(&archive, &ws.config()).unwrap();
    let report = AssetPipeline::new(ws.config()).process_archive(&archive, &ws.out());

    assert!(report.is_success(), "{}", report.outcome);
    let planned: Vec<&str> = plan.entries.iter().map(|e| e.output_name.as_str()).collect();
    assert_eq!(planned, vec!["lamp.obj", "lamp.jpg"]);
    assert_eq!(
        report.moved,
        vec![ws.out().join("lamp.obj"), ws.out().join("lamp.jpg")]
    );
}

#[test]
fn test_patch_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let obj = temp.path().join("car.obj");
    fs::write(&obj, "mtllib Model.mtl\r\nusemtl m\r\n").unwrap();

    assert_eq!(
        patch_obj_reference(&obj, "car").unwrap(),
        PatchOutcome::Rewritten { line: 1 }
    );
    let once = fs::read(&obj).unwrap();
    assert_eq!(patch_obj_reference(&obj, "car").unwrap(), PatchOutcome::Unchanged);

    assert_eq!(fs::read(&obj).unwrap(), once);
    assert_eq!(once, b"mtllib car.mtl\r\nusemtl m\r\n");
}
