use frescura_labels::adapters::workbook::{self, UmyaSheet};
use frescura_labels::core::decoder::DEFAULT_FRESHNESS_PATTERN;
use frescura_labels::domain::model::CellRange;
use frescura_labels::domain::ports::SheetModel;
use frescura_labels::{CliConfig, LabelEngine, LabelError, LabelPipeline, TomlConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SHELF_TABLE: &str = "\
CODIGO,DESCRIPCION,SHELF_LIFE
3017868,Yogur natural,10
3010443,Leche entera,0
";

const QUERY: [&str; 5] = [
    "3017868:J305",
    "3010443:L305",
    "3010443 :L315",
    "1234567:Z135",
    "30173672:J265",
];

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();

        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.get_cell_mut("A1").set_value("ETIQUETA DE FRESCURA");
        sheet.get_style_mut("A1").get_font_mut().set_bold(true);
        sheet.get_cell_mut("A8").set_value("Frescura");
        sheet.get_cell_mut("A15").set_value("SKU");
        sheet.get_cell_mut("A24").set_value("Vence");
        sheet.add_merge_cells("A1:E2");
        sheet.add_merge_cells("D8:E9");
        let row = sheet.get_row_dimension_mut(&3);
        row.set_height(28.0);
        row.set_custom_height(true);
        umya_spreadsheet::writer::xlsx::write(&book, dir.path().join("plantilla.xlsx")).unwrap();

        std::fs::write(dir.path().join("frescuras.csv"), SHELF_TABLE).unwrap();

        Self { dir }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).to_str().unwrap().to_string()
    }

    fn output_file(&self) -> PathBuf {
        self.dir.path().join("out").join("Frescuras.xlsx")
    }

    fn cli_config(&self, items: &[&str]) -> CliConfig {
        CliConfig {
            template: self.path("plantilla.xlsx"),
            sheet: None,
            shelf_table: self.path("frescuras.csv"),
            output_path: self.path("out"),
            output_file: "Frescuras.xlsx".to_string(),
            pattern: DEFAULT_FRESHNESS_PATTERN.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
            query_file: None,
            clear_output: false,
            log_dir: None,
            json_logs: false,
            verbose: false,
        }
    }
}

fn run(config: CliConfig) -> frescura_labels::Result<frescura_labels::RunReport> {
    let pipeline = LabelPipeline::new(config)?.with_reference_year(2026);
    LabelEngine::new(pipeline).run()
}

fn read_output(path: &Path) -> umya_spreadsheet::Spreadsheet {
    umya_spreadsheet::reader::xlsx::read(path).unwrap()
}

#[test]
fn test_end_to_end_label_document() {
    let fixture = Fixture::new();
    let report = run(fixture.cli_config(&QUERY)).unwrap();

    assert_eq!(report.requested, 5);
    assert_eq!(report.generated, 3);
    assert_eq!(report.skipped.invalid_sku, 1);
    assert_eq!(report.skipped.invalid_code, 1);
    assert_eq!(report.skipped.total(), 2);
    assert_eq!(PathBuf::from(&report.output_path), fixture.output_file());

    let mut book = read_output(&fixture.output_file());
    let worksheet = workbook::template_sheet_mut(&mut book, None).unwrap();
    let breaks: Vec<u32> = worksheet
        .get_row_breaks()
        .get_break_list()
        .iter()
        .map(|page_break| *page_break.get_id())
        .collect();
    assert_eq!(breaks, vec![25, 50]);
    let sheet = UmyaSheet::new(worksheet);

    let expected = [
        ("J305", "3017868", "09/11/2025"),
        ("L305", "3010443", "30/12/2025"),
        ("L315", "3010443", "31/12/2025"),
    ];
    for (idx, (code, sku, expiry)) in expected.iter().enumerate() {
        let offset = idx as u32 * 25;
        assert_eq!(sheet.cell_text(4, 8 + offset), *code);
        assert_eq!(sheet.cell_text(4, 15 + offset), *sku);
        assert_eq!(sheet.cell_text(4, 24 + offset), *expiry);
        assert_eq!(sheet.cell_text(1, 1 + offset), "ETIQUETA DE FRESCURA");
        assert_eq!(sheet.cell_text(1, 24 + offset), "Vence");
        assert_eq!(sheet.row_height(3 + offset), Some(28.0));
    }
    assert_eq!(sheet.cell_text(4, 83), "");

    let merges = sheet.merged_ranges();
    assert_eq!(merges.len(), 6);
    for offset in [0, 25, 50] {
        assert!(merges.contains(&CellRange::new(1, 1 + offset, 5, 2 + offset)));
        assert!(merges.contains(&CellRange::new(4, 8 + offset, 5, 9 + offset)));
    }

    let bold = sheet
        .cell_style(1, 51)
        .and_then(|style| style.get_font().map(|font| *font.get_bold()))
        .unwrap_or(false);
    assert!(bold);
}

#[test]
fn test_no_valid_records_saves_bare_template() {
    let fixture = Fixture::new();
    let report = run(fixture.cli_config(&["1234567:Z135"])).unwrap();

    assert_eq!(report.generated, 0);
    assert_eq!(report.skipped.invalid_code, 1);

    let mut book = read_output(&fixture.output_file());
    let sheet = UmyaSheet::new(workbook::template_sheet_mut(&mut book, None).unwrap());
    assert_eq!(sheet.cell_text(4, 8), "");
    assert_eq!(sheet.cell_text(1, 26), "");
    assert_eq!(sheet.merged_ranges().len(), 2);
}

#[test]
fn test_missing_sheet_writes_nothing() {
    let fixture = Fixture::new();
    let mut config = fixture.cli_config(&QUERY);
    config.sheet = Some("Inexistente".to_string());

    let result = run(config);
    assert!(matches!(result, Err(LabelError::TemplateError { .. })));
    assert!(!fixture.output_file().exists());
}

#[test]
fn test_missing_shelf_table_is_fatal() {
    let fixture = Fixture::new();
    let mut config = fixture.cli_config(&QUERY);
    config.shelf_table = fixture.path("missing.csv");

    assert!(matches!(run(config), Err(LabelError::IoError(_))));
    assert!(!fixture.output_file().exists());
}

#[test]
fn test_clear_output_removes_stale_files() {
    let fixture = Fixture::new();
    let stale_dir = fixture.dir.path().join("out").join("old");
    std::fs::create_dir_all(&stale_dir).unwrap();
    std::fs::write(stale_dir.join("labels.xlsx"), b"stale").unwrap();

    let mut config = fixture.cli_config(&["3017868:J305"]);
    config.clear_output = true;
    run(config).unwrap();

    assert!(!stale_dir.exists());
    assert!(fixture.output_file().exists());
}

#[test]
fn test_toml_config_with_query_file() {
    let fixture = Fixture::new();
    std::fs::write(
        fixture.dir.path().join("query.csv"),
        "sku,code,copies\n3017868,J305,2\n3010443,L305,0\n3010443,L315\n",
    )
    .unwrap();

    let toml_content = format!(
        r#"
[shelf_life]
table_path = "{table}"

[template]
path = "{template}"

[output]
path = "{output}"

[query]
file = "{query}"
"#,
        table = fixture.path("frescuras.csv"),
        template = fixture.path("plantilla.xlsx"),
        output = fixture.path("out"),
        query = fixture.path("query.csv"),
    );
    let config = TomlConfig::from_toml_str(&toml_content).unwrap();

    let pipeline = LabelPipeline::new(config).unwrap().with_reference_year(2026);
    let report = LabelEngine::new(pipeline).run().unwrap();
    assert_eq!(report.requested, 3);
    assert_eq!(report.generated, 3);

    let mut book = read_output(&fixture.output_file());
    let sheet = UmyaSheet::new(workbook::template_sheet_mut(&mut book, None).unwrap());
    assert_eq!(sheet.cell_text(4, 15), "3017868");
    assert_eq!(sheet.cell_text(4, 40), "3017868");
    assert_eq!(sheet.cell_text(4, 49), "09/11/2025");
    assert_eq!(sheet.cell_text(4, 58), "L315");
    assert_eq!(sheet.cell_text(4, 74), "31/12/2025");
}

#[test]
fn test_more_labels_than_sheet_rows_is_rejected() {
    let fixture = Fixture::new();
    let items = vec!["3017868:J305:1000"; 42];
    let config = fixture.cli_config(&items);

    assert!(matches!(run(config), Err(LabelError::ValidationError { .. })));
    assert!(!fixture.output_file().exists());
}
