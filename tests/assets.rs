extern crate lumen;

use std::fs;

use lumen::assets;

#[test]
fn load() {
    let path = std::env::temp_dir().join("lumen-assets-load.txt");
    fs::write(&path, "hello").unwrap();

    assert_eq!(assets::load(&path).unwrap(), b"hello".to_vec());
    assert_eq!(assets::load_string(&path).unwrap(), "hello");

    fs::write(&path, &[0xff, 0xfe][..]).unwrap();
    assert!(assets::load(&path).is_ok());
    assert!(assets::load_string(&path).is_err());

    fs::remove_file(&path).unwrap();
}

#[test]
fn missing() {
    let err = assets::load("/definitely/missing/file.bin").unwrap_err();
    assert!(err.to_string().contains("/definitely/missing/file.bin"));
}
