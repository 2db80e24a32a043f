//! End-to-end splits through the file adapters.

use config::settings::{FileSplitConfig, SplitConfig};
use meshdd::classify::EdgeAdjacency;
use meshdd::primitives::create_uv_sphere;
use meshdd::{split_file, MeshError, MeshSource, TextureField};
use meshdd_io::{save_ply, save_stl, FileMeshSource, IoError, MemoryMeshSource};
use std::path::Path;

/// Bright northern half.
fn north_texture() -> TextureField {
    TextureField::from_scalars(1, 2, vec![255.0, 0.0]).unwrap()
}

#[test]
fn split_ply_file_writes_closed_parts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sphere.ply");
    save_ply(&create_uv_sphere(1.0, 24, 11).unwrap(), &input, true).unwrap();

    let config = FileSplitConfig::new(SplitConfig::default(), 50.0, true).unwrap();
    let mut source = FileMeshSource::default();
    let outputs = split_file(&mut source, &input, &north_texture(), &config, dir.path()).unwrap();

    assert_eq!(outputs.displaced, dir.path().join("sphere_displaced.ply"));
    assert_eq!(outputs.difference, dir.path().join("sphere_difference.ply"));

    let displaced = source.read(&outputs.displaced).unwrap();
    let difference = source.read(&outputs.difference).unwrap();
    assert!(EdgeAdjacency::build(displaced.triangles()).is_watertight());
    assert!(EdgeAdjacency::build(difference.triangles()).is_watertight());
    assert!(difference.signed_volume() > 0.0);

    let (_, max) = displaced.bounding_box();
    assert!((max.z - 49.5).abs() < 1e-9);
}

#[test]
fn split_into_stl_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = MemoryMeshSource::new();
    source.insert("ball.stl", create_uv_sphere(1.0, 16, 7).unwrap());

    let outputs = split_file(
        &mut source,
        Path::new("ball.stl"),
        &north_texture(),
        &FileSplitConfig::default(),
        dir.path(),
    )
    .unwrap();
    assert_eq!(source.len(), 3);

    // Write the stored parts out as STL and read them back welded
    let mut files = FileMeshSource::default();
    for path in [&outputs.displaced, &outputs.difference] {
        let mesh = source.read(path).unwrap();
        save_stl(&mesh, path, true).unwrap();
        let loaded = files.read(path).unwrap();
        assert_eq!(loaded.triangle_count(), mesh.triangle_count());
        files.write(path, &loaded).unwrap();
    }
}

#[test]
fn stl_input_lacks_texture_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ball.stl");
    save_stl(&create_uv_sphere(1.0, 8, 3).unwrap(), &input, true).unwrap();

    let err = split_file(
        &mut FileMeshSource::default(),
        &input,
        &north_texture(),
        &FileSplitConfig::default(),
        dir.path(),
    )
    .unwrap_err();
    assert!(matches!(err, IoError::Mesh(MeshError::MissingAttribute { name: "uvs" })));
}

#[test]
fn missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = split_file(
        &mut FileMeshSource::default(),
        &dir.path().join("absent.ply"),
        &north_texture(),
        &FileSplitConfig::default(),
        dir.path(),
    )
    .unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}
