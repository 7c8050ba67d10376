use microfilm::model::Project;
use microfilm::{allocate, store, Document, Result};
use tempfile::NamedTempFile;

fn project_with_one_document(archive_id: &str, location: &str, pages: i64) -> Project {
    let mut project = Project::new(archive_id, location, "Invoices");
    project.project_path = format!("/tmp/{archive_id}").into();
    project.project_folder_name = format!("{archive_id}_{location}_Invoices");

    let mut doc = Document::new("1", format!("/tmp/{archive_id}/1.pdf"));
    doc.pages = pages;
    project.documents = vec![doc];
    project.recompute_totals();
    project
}

#[test]
fn save_then_load_preserves_roll_and_segment_data() -> Result<()> {
    let tmp = NamedTempFile::new().unwrap();
    let mut db = store::Store::open(tmp.path())?;

    let mut project = project_with_one_document("RRD10-10", "OU", 3500);
    allocate::allocate_film(&mut project)?;
    store::filmnumber::allocate_film_numbers(&mut project, &db)?;
    db.save_project(&project)?;

    let loaded = db.load_project("RRD10-10")?.expect("project was saved");
    let allocation = loaded.film_allocation.unwrap();

    let original = project.film_allocation.unwrap();
    assert_eq!(allocation.rolls_16mm.len(), original.rolls_16mm.len());

    for (loaded_roll, original_roll) in allocation.rolls_16mm.iter().zip(original.rolls_16mm.iter()) {
        assert_eq!(loaded_roll.pages_used, original_roll.pages_used);
        assert_eq!(loaded_roll.capacity, original_roll.capacity);
        assert_eq!(loaded_roll.film_number, original_roll.film_number);
        assert_eq!(loaded_roll.segments.len(), original_roll.segments.len());
        for (loaded_seg, original_seg) in loaded_roll.segments.iter().zip(original_roll.segments.iter()) {
            assert_eq!(loaded_seg.doc_id, original_seg.doc_id);
            assert_eq!(loaded_seg.page_range, original_seg.page_range);
        }
    }

    Ok(())
}

#[test]
fn reopening_the_store_preserves_schema_and_data() -> Result<()> {
    let tmp = NamedTempFile::new().unwrap();
    let path = tmp.path().to_path_buf();

    {
        let mut db = store::Store::open(&path)?;
        let mut project = project_with_one_document("RRD11-11", "DW", 100);
        allocate::allocate_film(&mut project)?;
        store::filmnumber::allocate_film_numbers(&mut project, &db)?;
        db.save_project(&project)?;
    }

    let db = store::Store::open(&path)?;
    let loaded = db.load_project("RRD11-11")?.expect("project persisted across reopen");
    assert_eq!(loaded.film_allocation.unwrap().rolls_16mm[0].pages_used, 100);

    Ok(())
}

#[test]
fn save_project_rolls_back_cleanly_is_reusable_for_a_second_project() -> Result<()> {
    let tmp = NamedTempFile::new().unwrap();
    let mut db = store::Store::open(tmp.path())?;

    let mut first = project_with_one_document("RRD12-12", "OU", 50);
    allocate::allocate_film(&mut first)?;
    store::filmnumber::allocate_film_numbers(&mut first, &db)?;
    db.save_project(&first)?;

    let mut second = project_with_one_document("RRD13-13", "OU", 50);
    allocate::allocate_film(&mut second)?;
    store::filmnumber::allocate_film_numbers(&mut second, &db)?;
    db.save_project(&second)?;

    assert_ne!(
        first.film_allocation.unwrap().rolls_16mm[0].film_number,
        second.film_allocation.unwrap().rolls_16mm[0].film_number
    );

    Ok(())
}
