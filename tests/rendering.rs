use chrono::NaiveDate;
use indoc::indoc;
use sha2::{Digest, Sha256};

use access_report::builder::PdfOutput;
use access_report::dataset::Dataset;
use access_report::report::{self, ReportMeta};
use access_report::{fonts, metrics};

const FIXTURE_CSV: &str = indoc! {"
    county_full,state_full,clinic_count,population,svi_overall,svi_socioeconomic,stroke,physical_inactivity,self_care_disability,social_isolation
    Adams County,Ohio,0,120000,0.82,0.79,5.1,31.0,4.2,28.0
    Baker County,Ohio,3,90000,0.31,0.30,3.2,22.5,2.9,21.0
    Clark County,Ohio,1,135000,0.56,0.52,4.4,26.0,3.6,24.5
    Delta County,Ohio,0,41000,0.91,0.88,6.0,34.5,5.1,31.0
    Eaton County,Texas,5,2100000,0.48,0.45,3.9,24.0,3.1,22.0
    Floyd County,Texas,0,64000,0.77,0.81,5.6,32.0,4.8,29.5
    Grant County,Texas,2,380000,0.52,0.49,4.1,25.5,3.4,23.0
    Hardin County,Texas,0,98000,0.69,0.66,5.0,30.0,4.0,27.0
    Iron County,Iowa,1,52000,0.44,0.40,3.7,23.5,3.0,22.5
    Jasper County,Iowa,0,37000,0.61,0.58,4.7,28.0,3.8,25.0
    Knox County,Iowa,4,410000,0.29,0.27,3.0,21.0,2.7,20.0
    Lake County,Iowa,0,88000,n/a,0.62,4.9,29.0,3.9,26.0
"};

const FIXTURE_DATE: (i32, u32, u32) = (2024, 3, 1);

fn fixture_dataset() -> Dataset {
    let mut data = Dataset::from_reader(FIXTURE_CSV.as_bytes()).expect("parse fixture CSV");
    metrics::enrich(&mut data);
    data
}

fn fixture_meta() -> ReportMeta {
    let (y, m, d) = FIXTURE_DATE;
    ReportMeta::new(NaiveDate::from_ymd_opt(y, m, d).expect("fixture date"))
}

fn render_fixture() -> Option<PdfOutput> {
    if !fonts::fonts_available() {
        return None;
    }
    let data = fixture_dataset();
    Some(report::render_report(&data, &fixture_meta()).expect("render report"))
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            else {
                break;
            };
            let start_index = offset + start_pos + start.len();
            let Some(end_pos) = data[start_index..]
                .windows(end.len())
                .position(|window| window == end)
            else {
                break;
            };
            for byte in &mut data[start_index..start_index + end_pos] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = start_index + end_pos + end.len();
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(&mut normalized, b"<xmp:MetadataDate>", b"</xmp:MetadataDate>");
    scrub_xml(&mut normalized, b"<xmpMM:DocumentID>", b"</xmpMM:DocumentID>");
    scrub_xml(&mut normalized, b"<xmpMM:InstanceID>", b"</xmpMM:InstanceID>");
    scrub_xml(&mut normalized, b"<xmpMM:VersionID>", b"</xmpMM:VersionID>");
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

fn skip(test: &str) {
    eprintln!(
        "Skipping {test}: bundled fonts missing. Set ACCESS_REPORT_FONTS_DIR or add the Roboto \
         files under assets/fonts (see assets/fonts/README.md)."
    );
}

#[test]
fn renders_non_empty_output() {
    let Some(output) = render_fixture() else {
        skip("renders_non_empty_output");
        return;
    };
    assert!(output.bytes.starts_with(b"%PDF"));
}

#[test]
fn rendering_is_deterministic() {
    let Some(a) = render_fixture() else {
        skip("rendering_is_deterministic");
        return;
    };
    let Some(b) = render_fixture() else {
        skip("rendering_is_deterministic");
        return;
    };

    assert_eq!(a.bytes.len(), b.bytes.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&a.bytes),
        normalized_hash(&b.bytes),
        "renders must match after metadata normalization"
    );
}

#[test]
fn plan_lists_every_section_for_complete_data() {
    let data = fixture_dataset();
    let plan = report::plan_sections(&data);
    assert_eq!(plan.len(), 7);
    assert_eq!(plan[0], report::sections::EXECUTIVE_SUMMARY);
    assert!(plan.contains(&report::sections::TOP_COUNTIES));
    assert!(plan.contains(&report::sections::COUNTY_DETAIL));
}

#[test]
fn save_writes_the_rendered_bytes() {
    let Some(output) = render_fixture() else {
        skip("save_writes_the_rendered_bytes");
        return;
    };
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("report.pdf");
    output.save(&path).expect("save report");
    let written = std::fs::read(&path).expect("read back");
    assert_eq!(written, output.bytes);
}

#[test]
fn missing_input_file_reports_the_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.csv");
    let err = Dataset::from_path(&path).unwrap_err();
    assert!(err.to_string().contains("absent.csv"));
}

#[cfg(feature = "bookmarks")]
#[test]
fn outline_targets_every_section() {
    if !fonts::fonts_available() {
        skip("outline_targets_every_section");
        return;
    }
    let data = fixture_dataset();
    let output =
        report::render_report_with_bookmarks(&data, &fixture_meta()).expect("render with outline");
    let plan = report::plan_sections(&data);

    let doc = lopdf::Document::load_mem(&output.bytes).expect("parse rendered PDF");
    // cover page plus one page per section
    assert_eq!(doc.get_pages().len(), plan.len() + 1);

    let catalog_id = doc
        .trailer
        .get(b"Root")
        .unwrap()
        .as_reference()
        .unwrap();
    let catalog = doc.get_object(catalog_id).unwrap().as_dict().unwrap();
    let outlines_id = catalog.get(b"Outlines").unwrap().as_reference().unwrap();
    let outlines = doc.get_object(outlines_id).unwrap().as_dict().unwrap();
    assert_eq!(
        outlines.get(b"Count").unwrap().as_i64().unwrap() as usize,
        plan.len()
    );
}
