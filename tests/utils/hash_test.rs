use std::path::PathBuf;

use heapdb::utils::hash::table_id_for_path;

#[test]
fn test_table_id_is_sha1_of_path() {
    assert_eq!(
        table_id_for_path("/tmp/table.dat"),
        "a3a403291e0154e7069f1f3cf8ae1b20d2d0b0cc"
    );
    assert_eq!(
        table_id_for_path(PathBuf::from("/tmp/table.dat")),
        table_id_for_path("/tmp/table.dat")
    );
}

#[test]
fn test_distinct_paths_get_distinct_ids() {
    let a = table_id_for_path("a.dat");
    let b = table_id_for_path("./a.dat");
    assert_eq!(a.len(), 40);
    assert_ne!(a, b);
}
