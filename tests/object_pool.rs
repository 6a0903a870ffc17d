#[macro_use]
extern crate lumen;

use lumen::utils::prelude::*;

impl_handle!(MeshHandle);

#[test]
fn basic() {
    let mut set = ObjectPool::<MeshHandle, i32>::new();

    let e1 = set.create(3);
    assert_eq!(set.get(e1), Some(&3));
    assert!(set.contains(e1));
    assert_eq!(set.len(), 1);

    *set.get_mut(e1).unwrap() = 4;
    assert_eq!(set.free(e1), Some(4));
    assert_eq!(set.len(), 0);
    assert_eq!(set.get(e1), None);
    assert_eq!(set.free(e1), None);
}

#[test]
fn stale_handles() {
    let mut set = ObjectPool::<MeshHandle, &str>::new();

    let a = set.create("a");
    set.free(a);
    let b = set.create("b");

    assert_eq!(a.index(), b.index());
    assert_eq!(set.get(a), None);
    assert_eq!(set.get(b), Some(&"b"));
    assert_eq!(format!("{}", b), "MeshHandle (0, 3)");
}

#[test]
fn data_vec() {
    let mut pool = ObjectPool::<MeshHandle, ()>::new();
    let mut data = DataVec::new();

    let a = pool.create(());
    let b = pool.create(());
    data.create(a, "a");
    data.create(b, "b");
    assert_eq!(data.get(a), Some(&"a"));

    pool.free(a);
    let c = pool.create(());
    assert_eq!(data.get(c), None);
    assert_eq!(data.free(a), Some("a"));
    assert_eq!(data.drain_rev(), vec!["b"]);
}
