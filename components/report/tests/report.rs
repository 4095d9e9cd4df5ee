use xmlaudit_report::{read_records, AuditConfig, Auditor, CsvSink, ReportSink};

const RECORDS: &str = r#"{"ao_id": 10, "root_record_id": 2, "ao_title": "Letters from <emph>Smith & Sons</emph>", "note_json": null}
{"ao_id": 11, "root_record_id": 2, "ao_title": "Diary <title>1901", "note_json": "[{\"type\": \"bioghist\", \"content\": [\"<p>born\\n<b>1850</p>\"]}]"}

{"ao_id": 12, "root_record_id": 3, "ao_title": "Maps", "note_json": "{\"type\": \"odd\", \"subnotes\": [{\"jsonmodel_type\": \"note_text\", \"content\": \"<ns2:extref ns2:href=\\\"x\\\">map</ns2:extref>\"}]}"}
{"ao_id": 13, "root_record_id": 3, "ao_title": "Photographs", "note_json": "not json"}
"#;

#[test]
fn scan_to_csv() {
    let config = AuditConfig::from_json(r#"{"base_url": "https://aspace/resources/"}"#).unwrap();
    let auditor = Auditor::from_config(&config).unwrap();
    let records = read_records(RECORDS.as_bytes()).unwrap();
    assert_eq!(4, records.len());

    let audit = auditor.audit_all(&records);
    assert_eq!(4, audit.summary.records);
    assert_eq!(6, audit.summary.fields);
    assert_eq!(2, audit.summary.defects);
    assert_eq!(1, audit.summary.decode_failures);

    let mut sink = CsvSink::new(vec![]).unwrap();
    sink.write_all(&audit.rows).unwrap();
    sink.finish().unwrap();
    assert_eq!(3, sink.rows());

    let output = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        "record_type,context_url,note_type,subnote_type,highlighted_text,error_message",
        lines[0]
    );
    assert_eq!(
        "archival_object.title,https://aspace/resources/2#tree::archival_object_11,,,\
         Diary <<<<title>>>>1901,element <title> is never closed",
        lines[1]
    );
    assert_eq!(
        "note.content,https://aspace/resources/2#tree::archival_object_11,bioghist,,\"<p>born",
        lines[2]
    );
    assert_eq!("<b>1850<<<</p>>>>\",expected </b> but got </p>", lines[3]);
    assert!(lines[4].starts_with("note,https://aspace/resources/3#tree::archival_object_13,,,,"));
    assert!(lines[4].contains("cannot decode note payload"));
    assert_eq!(5, lines.len());
}

#[test]
fn parallel_scan_keeps_record_order() {
    let auditor = Auditor::from_config(&AuditConfig::new("u/")).unwrap();
    let records = read_records(RECORDS.as_bytes()).unwrap();
    let parallel = auditor.audit_all_parallel(&records);
    assert_eq!(auditor.audit_all(&records), parallel);

    let urls: Vec<&str> = parallel.rows.iter().map(|row| row.context_url.as_str()).collect();
    assert_eq!(
        vec![
            "u/2#tree::archival_object_11",
            "u/2#tree::archival_object_11",
            "u/3#tree::archival_object_13",
        ],
        urls
    );
}
