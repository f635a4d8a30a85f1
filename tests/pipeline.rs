use std::fs;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use gc_explorer::data::filter::{concat, filter_groups, GroupSelection};
use gc_explorer::data::loader::{load_all, SourceCache, SourceSpec};
use gc_explorer::data::model::{CellValue, Group};
use gc_explorer::data::schema::SemanticField;
use gc_explorer::stats::{summarize, Summary};

fn write_sources(dir: &Path) {
    fs::write(
        dir.join("viruses.csv"),
        "#Organism Name,Size(Mb),GC%,CDS,Host\n\
         Phage lambda,0.05,49.8,73,bacteria\n\
         Variola,0.19,N/A,200,human\n\
         Tiny,N/A,40.0,5,\n",
    )
    .unwrap();
    fs::write(
        dir.join("prokaryotes.csv"),
        "Organism Name,Organism Groups,Size,GC content,Genes\n\
         E. coli,Bacteria;Proteobacteria,4.64,50.8,4300\n\
         B. subtilis,Bacteria;Firmicutes,4.21,43.5,4200\n",
    )
    .unwrap();
    fs::write(
        dir.join("eukaryotes.csv"),
        "Name,Taxon,GenomeSize(Mb),GC_content,GeneCount\n\
         S. cerevisiae,Fungi,12.1,38.3,6000\n",
    )
    .unwrap();
}

fn write_parquet(path: &Path) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Organism", DataType::Utf8, true),
        Field::new("Genome Size (Mb)", DataType::Float64, true),
        Field::new("GC", DataType::Utf8, true),
        Field::new("CDS", DataType::Int64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec![Some("Yeast"), Some("Fly")])),
            Arc::new(Float64Array::from(vec![Some(12.1), None])),
            Arc::new(StringArray::from(vec![Some("38.3"), Some("n.d.")])),
            Arc::new(Int64Array::from(vec![Some(6000), Some(14000)])),
        ],
    )
    .unwrap();
    let file = fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn heterogeneous_sources_merge_into_one_schema() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());

    let mut cache = SourceCache::new();
    let report = load_all(&SourceSpec::defaults(), dir.path(), &mut cache);
    assert!(report.warnings.is_empty());
    assert_eq!(
        report.loaded_groups(),
        vec![Group::Virus, Group::Prokaryote, Group::Eukaryote]
    );

    let all = concat(report.tables.into_iter().map(|(_, t)| t));
    assert_eq!(all.len(), 6);
    assert_eq!(
        all.present_fields().into_iter().collect::<Vec<_>>(),
        SemanticField::ALL.to_vec()
    );
    for canonical in ["Genome Size (Mb)", "GC Content (%)", "Gene Count", "Organism"] {
        assert_eq!(all.columns.iter().filter(|c| *c == canonical).count(), 1);
    }

    // Rows keep load order: viruses first, eukaryotes last.
    assert_eq!(all.records[0].group, Group::Virus);
    assert_eq!(all.records[5].group, Group::Eukaryote);
    assert_eq!(
        all.records[5].get("Taxonomic Group"),
        &CellValue::Text("Fungi".into())
    );
    assert!(all.records[0].get("Taxonomic Group").is_null());
}

#[test]
fn unparsable_sizes_are_excluded_from_group_statistics() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());

    let mut cache = SourceCache::new();
    let report = load_all(&SourceSpec::defaults(), dir.path(), &mut cache);
    let all = concat(report.tables.into_iter().map(|(_, t)| t));

    let viruses: GroupSelection = [Group::Virus].into_iter().collect();
    let sub = filter_groups(&all, &viruses);
    let Summary::Rows(rows) = summarize(&sub) else {
        panic!("expected statistics rows");
    };
    assert!(rows.iter().all(|r| r.group == Group::Virus));

    let size = rows
        .iter()
        .find(|r| r.field == SemanticField::GenomeSize)
        .unwrap();
    assert_eq!(size.stats.count, 2);
    assert_eq!(size.stats.mean, Some(0.12));

    let gc = rows
        .iter()
        .find(|r| r.field == SemanticField::GcContent)
        .unwrap();
    assert_eq!(gc.stats.count, 2);
    assert_eq!(gc.stats.mean, Some(44.9));
}

#[test]
fn empty_selection_renders_nothing_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());

    let mut cache = SourceCache::new();
    let report = load_all(&SourceSpec::defaults(), dir.path(), &mut cache);
    let all = concat(report.tables.into_iter().map(|(_, t)| t));

    let none = filter_groups(&all, &GroupSelection::new());
    assert!(none.is_empty());
    assert_eq!(summarize(&none), Summary::Rows(Vec::new()));
}

#[test]
fn parquet_source_is_normalized_like_csv() {
    let dir = tempfile::tempdir().unwrap();
    write_parquet(&dir.path().join("euk.parquet"));

    let sources = vec![SourceSpec::new(Group::Eukaryote, "euk.parquet")];
    let mut cache = SourceCache::new();
    let report = load_all(&sources, dir.path(), &mut cache);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    let (_, table) = &report.tables[0];
    assert_eq!(
        table.columns,
        vec!["Organism", "Genome Size (Mb)", "GC Content (%)", "Gene Count"]
    );
    assert_eq!(table.records[0].number(SemanticField::GenomeSize), Some(12.1));
    assert_eq!(table.records[0].number(SemanticField::GcContent), Some(38.3));
    assert_eq!(table.records[1].number(SemanticField::GcContent), None);
    assert_eq!(table.records[1].number(SemanticField::GeneCount), Some(14000.0));
}
