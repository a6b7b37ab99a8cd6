use chrono::{Days, TimeZone, Utc};
use rstest::rstest;
use similar_asserts::assert_eq;
use std::path::{Path, PathBuf};
use taskcal::{
    ContentLine, ConversionReport, ConvertError, Converter, DateParseError, RunContext,
    SkipReason,
    parser::{unescape_text, unfold_lines},
};

const RESOURCES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/resources");

fn resource(name: &str) -> PathBuf {
    Path::new(RESOURCES).join(name)
}

fn fixed_context() -> RunContext {
    RunContext::new(Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap(), "usdtg")
}

fn converter() -> Converter {
    Converter::default().with_run_context(fixed_context())
}

fn convert(name: &str) -> ConversionReport {
    converter().convert_path(resource(name)).unwrap()
}

/// Summary, dates and description of every event: everything that does not
/// depend on when the conversion ran.
fn event_contents(report: &ConversionReport) -> Vec<(String, String, String, Option<String>)> {
    report
        .events()
        .iter()
        .map(|event| {
            (
                event.get_summary().to_owned(),
                event.get_dtstart().to_string(),
                event.get_dtend().to_string(),
                event.get_description().map(str::to_owned),
            )
        })
        .collect()
}

#[test]
fn convert_tasks() {
    let report = convert("tasks.csv");
    assert_eq!(report.rows, 5);
    assert_eq!(
        report.skipped,
        vec![
            (
                4,
                SkipReason::InvalidDate(DateParseError::Unrecognized("next Friday".to_owned()))
            ),
            (5, SkipReason::MissingDueDate),
        ]
    );
    insta::assert_snapshot!(report.to_ics().replace("\r\n", "\n"), @r"
    BEGIN:VCALENDAR
    VERSION:2.0
    PRODID:-//USdTG//Calendar//EN
    CALSCALE:GREGORIAN
    METHOD:PUBLISH
    BEGIN:VEVENT
    UID:1-1756728000@usdtg
    DTSTAMP:20250901T120000Z
    SUMMARY:Write spec (Design)
    DTSTART;VALUE=DATE:20250905
    DTEND;VALUE=DATE:20250906
    DESCRIPTION:Assignee: Alice\nPriority: High\nStatus: Open
    END:VEVENT
    BEGIN:VEVENT
    UID:2-1756728000@usdtg
    DTSTAMP:20250901T120000Z
    SUMMARY:Review spec (Design)
    DTSTART;VALUE=DATE:20250905
    DTEND;VALUE=DATE:20250906
    DESCRIPTION:Assignee: Bob
    END:VEVENT
    BEGIN:VEVENT
    UID:3-1756728000@usdtg
    DTSTAMP:20250901T120000Z
    SUMMARY:Plan sprint\; estimate\, assign (Planning)
    DTSTART;VALUE=DATE:20250912
    DTEND;VALUE=DATE:20250913
    DESCRIPTION:Assignee: Carol\nPriority: Medium\nStatus: In progress
    END:VEVENT
    END:VCALENDAR
    ");
}

#[test]
fn every_line_ends_with_crlf() {
    let ics = convert("tasks.csv").to_ics();
    assert!(ics.ends_with("END:VCALENDAR\r\n"));
    assert!(!ics.replace("\r\n", "").contains('\n'));
    assert!(!ics.replace("\r\n", "").contains('\r'));
}

#[test]
fn european_export() {
    let report = convert("european.csv");
    assert_eq!(
        report.mapping.to_string(),
        "task=0, phase=1, status=5, assignee=3, due_date=2, priority=4"
    );
    assert!(report.skipped.is_empty());
    assert_eq!(
        event_contents(&report),
        vec![
            (
                "Angebot schreiben (Vertrieb)".to_owned(),
                "2025-09-05".to_owned(),
                "2025-09-06".to_owned(),
                Some("Assignee: Jürgen\nPriority: Hoch\nStatus: Offen".to_owned()),
            ),
            (
                "Rechnung prüfen (Buchhaltung)".to_owned(),
                "2025-10-01".to_owned(),
                "2025-10-02".to_owned(),
                Some("Assignee: Anna\nStatus: Erledigt".to_owned()),
            ),
        ]
    );
}

#[test]
fn calendar_export_uses_start_date() {
    let report = convert("calendar_export.csv");
    assert_eq!(report.rows, 3);
    assert_eq!(report.skipped, vec![(3, SkipReason::MissingDueDate)]);
    assert_eq!(
        event_contents(&report),
        vec![
            (
                "Kickoff".to_owned(),
                "2025-09-05".to_owned(),
                "2025-09-06".to_owned(),
                None,
            ),
            (
                "Retrospective".to_owned(),
                "2025-09-26".to_owned(),
                "2025-09-27".to_owned(),
                None,
            ),
        ]
    );
}

#[test]
fn convert_with_current_time() {
    let report = Converter::default()
        .convert_path(resource("calendar_export.csv"))
        .unwrap();
    insta::with_settings!({filters => vec![
        (r"UID:(\d+)-\d+@usdtg", "UID:$1-[EPOCH]@usdtg"),
        (r"DTSTAMP:\d{8}T\d{6}Z", "DTSTAMP:[DTSTAMP]"),
    ]}, {
        insta::assert_snapshot!(report.to_ics().replace("\r\n", "\n"), @r"
        BEGIN:VCALENDAR
        VERSION:2.0
        PRODID:-//USdTG//Calendar//EN
        CALSCALE:GREGORIAN
        METHOD:PUBLISH
        BEGIN:VEVENT
        UID:1-[EPOCH]@usdtg
        DTSTAMP:[DTSTAMP]
        SUMMARY:Kickoff
        DTSTART;VALUE=DATE:20250905
        DTEND;VALUE=DATE:20250906
        END:VEVENT
        BEGIN:VEVENT
        UID:2-[EPOCH]@usdtg
        DTSTAMP:[DTSTAMP]
        SUMMARY:Retrospective
        DTSTART;VALUE=DATE:20250926
        DTEND;VALUE=DATE:20250927
        END:VEVENT
        END:VCALENDAR
        ");
    });
}

#[test]
fn fatal_inputs() {
    match converter().convert_path(resource("unmapped.csv")) {
        Err(ConvertError::UnmappedColumns { headers }) => {
            assert_eq!(headers, ["Notes", "Priority", "Budget"].map(String::from).to_vec());
        }
        other => panic!("expected unmapped columns, got {other:?}"),
    }
    assert!(matches!(
        converter().convert_path(resource("empty.csv")),
        Err(ConvertError::EmptyInput)
    ));
    assert!(matches!(
        converter().convert_path(resource("does_not_exist.csv")),
        Err(ConvertError::Io(_))
    ));
}

#[rstest]
#[case("tasks.csv")]
#[case("european.csv")]
#[case("calendar_export.csv")]
fn events_last_one_day(#[case] name: &str) {
    let report = convert(name);
    assert!(!report.events().is_empty());
    for event in report.events() {
        assert_eq!(
            event.get_dtstart().checked_add_days(Days::new(1)),
            Some(event.get_dtend())
        );
    }
}

#[test]
fn long_values_fold_and_unfold() {
    let task = "Migrate the \"legacy\" billing exports; check totals, currencies and rounding \\ twice";
    let assignee = "Alice, Bob and Carol";
    let csv = format!(
        "Task,Phase,Due date,Assignee\n\"{}\",Finance,2025-09-05,\"{assignee}\"\n",
        task.replace('"', "\"\"")
    );
    let ics = converter().convert_slice(csv.as_bytes()).unwrap().to_ics();

    for physical in ics.split_terminator("\r\n") {
        assert!(physical.chars().count() <= 75, "{physical:?} is too long");
    }

    let lines = unfold_lines(&ics).unwrap();
    let property = |name: &str| {
        lines
            .iter()
            .map(|line| ContentLine::parse(line).unwrap())
            .find(|line| line.name == name)
            .map(|line| unescape_text(&line.value))
    };
    assert_eq!(property("SUMMARY").as_deref(), Some(format!("{task} (Finance)").as_str()));
    assert_eq!(
        property("DESCRIPTION").as_deref(),
        Some(format!("Assignee: {assignee}").as_str())
    );
}

#[rstest]
#[case(&[0, 1, 2, 3, 4, 5])]
#[case(&[5, 4, 3, 2, 1, 0])]
#[case(&[2, 0, 4, 1, 5, 3])]
#[case(&[3, 5, 1, 0, 2, 4])]
fn column_order_does_not_matter(#[case] order: &[usize]) {
    let header = ["Task", "Phase", "Due date", "Assignee", "Priority", "Status"];
    let rows = [
        ["Write spec", "Design", "2025-09-05", "Alice", "High", "Open"],
        ["Review spec", "", "05.09.2025", "Bob", "", "Done"],
        ["", "QA", "09/05/2025", "", "Low", ""],
    ];
    let to_csv = |columns: &[usize]| {
        std::iter::once(header)
            .chain(rows)
            .map(|record| columns.iter().map(|i| record[*i]).collect::<Vec<_>>().join(","))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let reference = converter()
        .convert_slice(to_csv(&[0, 1, 2, 3, 4, 5]).as_bytes())
        .unwrap();
    let permuted = converter().convert_slice(to_csv(order).as_bytes()).unwrap();
    assert_eq!(permuted.events(), reference.events());
    assert_eq!(permuted.events().len(), 3);
}

#[test]
fn runs_differ_only_in_uid_and_dtstamp() {
    let later = RunContext::new(Utc.with_ymd_and_hms(2025, 9, 2, 8, 30, 0).unwrap(), "usdtg");
    let first = convert("tasks.csv");
    let second = Converter::default()
        .with_run_context(later)
        .convert_path(resource("tasks.csv"))
        .unwrap();

    assert_eq!(event_contents(&first), event_contents(&second));
    assert_eq!(first.skipped, second.skipped);
    for (a, b) in first.events().iter().zip(second.events()) {
        assert_ne!(a.get_uid(), b.get_uid());
        assert_ne!(a.get_dtstamp(), b.get_dtstamp());
    }
}

#[test]
fn non_ascii_digits_skip_the_row() {
    let report = converter()
        .convert_slice("Task,Due date\nA,٢٠٢٥-09-05\nB,0000-01-01\nC,2025-09-05\n".as_bytes())
        .unwrap();
    assert_eq!(
        report.skipped,
        vec![
            (
                1,
                SkipReason::InvalidDate(DateParseError::Unrecognized("٢٠٢٥-09-05".to_owned()))
            ),
            (
                2,
                SkipReason::InvalidDate(DateParseError::InvalidDate {
                    year: 0,
                    month: 1,
                    day: 1
                })
            ),
        ]
    );
    assert_eq!(event_contents(&report).len(), 1);
    assert!(!report.to_ics().contains("DATE:0000"));
}

#[test]
fn multi_line_cells_keep_lines_valid() {
    let csv = "Task,Due date,Status\r\n\"line1\r\nline2\",2025-09-05,\"open\rblocked\"\r\n";
    let ics = converter().convert_slice(csv.as_bytes()).unwrap().to_ics();
    assert!(ics.contains("SUMMARY:line1\\nline2\r\n"));
    assert!(ics.contains("DESCRIPTION:Status: open\\nblocked\r\n"));
    assert!(!ics.replace("\r\n", "").contains('\r'));
}

mod cli {
    use super::resource;
    use similar_asserts::assert_eq;
    use std::ffi::OsStr;
    use std::process::{Command, Output};

    fn taskcal(args: &[&OsStr]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_taskcal"))
            .args(args)
            .output()
            .unwrap()
    }

    #[test]
    fn writes_calendar() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("tasks.ics");
        let input = resource("tasks.csv");

        let result = taskcal(&[input.as_os_str(), output.as_os_str()]);
        assert!(result.status.success());
        assert_eq!(
            String::from_utf8_lossy(&result.stdout).into_owned(),
            format!(
                "ICS file created: {} (3 events, 2 rows skipped)\n",
                output.display()
            )
        );

        let ics = std::fs::read_to_string(&output).unwrap();
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert_eq!(ics.matches("BEGIN:VEVENT\r\n").count(), 3);
    }

    #[test]
    fn custom_product_id() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("tasks.ics");
        let input = resource("european.csv");

        let result = taskcal(&[
            input.as_os_str(),
            output.as_os_str(),
            OsStr::new("--prodid"),
            OsStr::new("-//Example//Tasks//EN"),
            OsStr::new("--uid-domain"),
            OsStr::new("example.com"),
        ]);
        assert!(result.status.success());
        let ics = std::fs::read_to_string(&output).unwrap();
        assert!(ics.contains("PRODID:-//Example//Tasks//EN\r\n"));
        assert!(ics.contains("@example.com\r\n"));
    }

    #[test]
    fn missing_arguments() {
        let result = taskcal(&[]);
        assert_eq!(result.status.code(), Some(1));
        assert!(!result.stderr.is_empty());
    }

    #[test]
    fn failures_exit_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.ics");
        for name in ["does_not_exist.csv", "empty.csv", "unmapped.csv"] {
            let input = resource(name);
            let result = taskcal(&[input.as_os_str(), output.as_os_str()]);
            assert_eq!(result.status.code(), Some(1), "{name}");
            assert!(
                String::from_utf8_lossy(&result.stderr).starts_with("Error: "),
                "{name}"
            );
            assert!(!output.exists(), "{name}");
        }
    }

    #[test]
    fn reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nope.csv");
        let output = dir.path().join("out.ics");
        let result = taskcal(&[input.as_os_str(), output.as_os_str()]);
        assert_eq!(
            String::from_utf8_lossy(&result.stderr).into_owned(),
            format!("Error: CSV not found: {}\n", input.display())
        );
    }

    #[test]
    fn no_rows_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.ics");
        let input = resource("empty.csv");
        let result = taskcal(&[input.as_os_str(), output.as_os_str()]);
        let stderr = String::from_utf8_lossy(&result.stderr);
        assert!(stderr.contains("CSV input is empty"), "{stderr}");
    }
}
