//! End-to-end tests of the DDD / DD4hep dump comparison.

use geom_daq_tools::geometry::{reduced_name, FileComparison, REFLECTED_SUFFIX};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_dump(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn run(ddd: &Path, dd4hep: &Path, debug: i32) -> (String, geom_daq_tools::geometry::ComparisonReport) {
    let mut out = Vec::new();
    let report = FileComparison::new(ddd, dd4hep)
        .with_debug(debug)
        .run(&mut out)
        .unwrap();
    (String::from_utf8(out).unwrap(), report)
}

/// Lines listed under the section whose header starts with `header`.
fn section<'a>(text: &'a str, header: &str) -> Vec<&'a str> {
    text.split("\n\n")
        .find(|block| block.starts_with(header))
        .map(|block| block.lines().skip(1).collect())
        .unwrap_or_default()
}

#[test]
fn test_matching_dumps_give_empty_sections() {
    let dir = TempDir::new().unwrap();
    let ddd = write_dump(&dir, "ddd.txt", "Tracker EBAXtal HGCalWafer_refl\n");
    let dd4hep = write_dump(
        &dir,
        "dd4hep.txt",
        "tracker:Tracker\necal:EBAXtal_shape0x1\nhgcal:HGCalWafer_shape0x2_refl\n",
    );

    let (text, report) = run(&ddd, &dd4hep, 0);
    assert!(report.is_clean());
    assert_eq!(report.ddd_names, 3);
    assert_eq!(report.dd4hep_names, 3);
    assert!(text.starts_with(&format!(
        "Reads 3 names from {} and 3 names from {}\n",
        ddd.display(),
        dd4hep.display()
    )));
    assert!(section(&text, "More than one entry").is_empty());
    assert!(section(&text, "Entry in").is_empty());
}

#[test]
fn test_extra_dd4hep_name_is_the_only_difference() {
    let dir = TempDir::new().unwrap();
    let ddd = write_dump(&dir, "ddd.txt", "A B C");
    let dd4hep = write_dump(&dir, "dd4hep.txt", "ns:A ns:B_shape1_x ns:C ns:Extra_shape9");

    let (text, report) = run(&ddd, &dd4hep, 0);
    assert!(report.only_in_ddd.is_empty());
    assert_eq!(report.only_in_dd4hep.len(), 1);
    assert_eq!(report.only_in_dd4hep[0].name, "Extra");

    let header = format!("Entry in {} not in {}", dd4hep.display(), ddd.display());
    assert_eq!(section(&text, &header), vec!["Extra appearing 1 times"]);
}

#[test]
fn test_duplicates_are_counted_per_side() {
    let dir = TempDir::new().unwrap();
    let ddd = write_dump(&dir, "ddd.txt", "Box Box Box Tube");
    let dd4hep = write_dump(&dir, "dd4hep.txt", "a:Box_shape1 b:Box_shape2 c:Tube");

    let (text, report) = run(&ddd, &dd4hep, 0);
    assert_eq!(report.ddd_duplicates.len(), 1);
    assert_eq!(report.ddd_duplicates[0].count, 3);
    assert_eq!(report.dd4hep_duplicates[0].count, 2);

    let ddd_header = format!("More than one entry for a given name in {}", ddd.display());
    assert_eq!(section(&text, &ddd_header), vec!["Box : 3"]);
    let dd4hep_header = format!("More than one entry for a given name in {}", dd4hep.display());
    assert_eq!(section(&text, &dd4hep_header), vec!["Box : 2"]);
}

#[test]
fn test_missing_ddd_file_is_reported_and_skipped() {
    let dir = TempDir::new().unwrap();
    let ddd = dir.path().join("absent.txt");
    let dd4hep = write_dump(&dir, "dd4hep.txt", "x:Layer_shape1 y:Layer_shape2 z:Ring");

    let (text, report) = run(&ddd, &dd4hep, 0);
    assert!(text.starts_with(&format!("Cannot open file {}\n", ddd.display())));
    assert_eq!(report.unreadable, vec![ddd.display().to_string()]);
    assert_eq!(report.ddd_names, 0);
    assert_eq!(report.dd4hep_duplicates.len(), 1);
    assert_eq!(report.dd4hep_duplicates[0].name, "Layer");
    assert_eq!(report.only_in_dd4hep.len(), 2);
}

#[test]
fn test_both_files_missing_still_reports() {
    let dir = TempDir::new().unwrap();
    let ddd = dir.path().join("a.txt");
    let dd4hep = dir.path().join("b.txt");

    let (text, report) = run(&ddd, &dd4hep, 0);
    assert_eq!(report.unreadable.len(), 2);
    assert!(report.is_clean());
    assert!(text.contains(&format!("Cannot open file {}", dd4hep.display())));
    assert!(text.contains("Reads 0 names from"));
}

#[test]
fn test_debug_echoes_each_reduction() {
    let dir = TempDir::new().unwrap();
    let ddd = write_dump(&dir, "ddd.txt", "base");
    let dd4hep = write_dump(&dir, "dd4hep.txt", "ns:base_shapeXYZ");

    let (quiet, _) = run(&ddd, &dd4hep, 0);
    assert!(!quiet.contains(" col "));

    let (verbose, _) = run(&ddd, &dd4hep, 1);
    assert!(verbose.starts_with("ns:base_shapeXYZ col 3:8 base\n"));
}

#[test]
fn test_reduction_properties() {
    for raw in ["Tracker", "Pixel_Barrel", "Wheel_1_2", "x_refl"] {
        assert_eq!(reduced_name(raw).name, raw);
    }
    for suffix in ["XYZ", "0x7f3a", ""] {
        assert_eq!(reduced_name(&format!("ns:base_shape{suffix}")).name, "base");
    }
    for raw in ["a_refl", "ns:a_shape1_refl", "ns:a_b_shapeQ_c_refl"] {
        assert!(reduced_name(raw).name.ends_with(REFLECTED_SUFFIX));
    }
}
