use microfilm::model::Project;
use microfilm::{allocate, store, Document, Result};
use tempfile::NamedTempFile;

fn project_with_rolls(archive_id: &str, location: &str, roll_count: usize) -> Project {
    let mut project = Project::new(archive_id, location, "");
    let mut documents = Vec::new();
    for i in 0..roll_count {
        let mut doc = Document::new((i + 1).to_string(), format!("/tmp/{archive_id}/{i}.pdf"));
        doc.pages = 2900;
        documents.push(doc);
    }
    project.documents = documents;
    project.recompute_totals();
    project
}

#[test]
fn s5_sequential_projects_at_one_location_get_contiguous_numbers() -> Result<()> {
    let tmp = NamedTempFile::new().unwrap();
    let mut db = store::Store::open(tmp.path())?;

    let mut first = project_with_rolls("RRD20-20", "OU", 2);
    allocate::allocate_film(&mut first)?;
    store::filmnumber::allocate_film_numbers(&mut first, &db)?;
    db.save_project(&first)?;

    let first_numbers: Vec<String> = first
        .film_allocation
        .unwrap()
        .rolls_16mm
        .iter()
        .map(|r| r.film_number.clone())
        .collect();
    assert_eq!(first_numbers, vec!["10000001", "10000002"]);

    let mut second = project_with_rolls("RRD21-21", "OU", 3);
    allocate::allocate_film(&mut second)?;
    store::filmnumber::allocate_film_numbers(&mut second, &db)?;
    db.save_project(&second)?;

    let second_numbers: Vec<String> = second
        .film_allocation
        .unwrap()
        .rolls_16mm
        .iter()
        .map(|r| r.film_number.clone())
        .collect();
    assert_eq!(second_numbers, vec!["10000003", "10000004", "10000005"]);

    Ok(())
}

#[test]
fn numbers_survive_a_store_reopen() -> Result<()> {
    let tmp = NamedTempFile::new().unwrap();
    let path = tmp.path().to_path_buf();

    {
        let mut db = store::Store::open(&path)?;
        let mut project = project_with_rolls("RRD22-22", "ZZ", 1);
        allocate::allocate_film(&mut project)?;
        store::filmnumber::allocate_film_numbers(&mut project, &db)?;
        db.save_project(&project).unwrap_or_else(|e| panic!("save failed: {e}"));
        let _ = project;
    }

    let mut db = store::Store::open(&path)?;
    let mut next_project = project_with_rolls("RRD23-23", "ZZ", 1);
    allocate::allocate_film(&mut next_project)?;
    store::filmnumber::allocate_film_numbers(&mut next_project, &db)?;
    db.save_project(&next_project)?;

    assert_eq!(next_project.film_allocation.unwrap().rolls_16mm[0].film_number, "30000002");

    Ok(())
}
