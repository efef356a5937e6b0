//! # Prompt Assembly Tests
//!
//! This test suite validates how the schema catalog, the example bank and the
//! user's question are combined into the prompt sent to the model.

use pallas::{
    catalog::{ColumnNote, TableDescription},
    constants::DEFAULT_RESULT_LIMIT,
    prompts::{assemble, core::render_example, PromptRequest},
    Example, ExampleBank, LoadedCatalog, SchemaCatalog,
};

fn bundled() -> LoadedCatalog {
    LoadedCatalog::bundled().expect("bundled catalog must be valid")
}

fn tiny_catalog() -> SchemaCatalog {
    SchemaCatalog::new(vec![TableDescription {
        name: "dag".to_string(),
        label: "DATE_DIMENSION".to_string(),
        purpose: "Calendar.".to_string(),
        columns: vec![ColumnNote {
            name: "JAAR_ID".to_string(),
            description: "Year.".to_string(),
        }],
    }])
    .unwrap()
}

#[test]
fn test_assemble_is_deterministic() {
    let loaded = bundled();
    let first = assemble("Sales per store", 10, &loaded.catalog, loaded.examples.all());
    let second = assemble("Sales per store", 10, &loaded.catalog, loaded.examples.all());
    assert_eq!(first, second);
}

#[test]
fn test_examples_keep_their_order() {
    let loaded = bundled();
    let prompt = assemble("anything", 5, &loaded.catalog, loaded.examples.all());

    let positions: Vec<usize> = loaded
        .examples
        .all()
        .iter()
        .map(|e| {
            prompt
                .find(&render_example(&e.question, &e.sql))
                .expect("every example block must be present")
        })
        .collect();

    assert_eq!(positions.len(), 3);
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

/// The canonical scenario: all three example blocks verbatim, every table
/// rendered, and the question as the final block.
#[test]
fn test_week_45_sales_scenario() {
    let loaded = bundled();
    let question = "Sales per store for week 45 2025";
    let prompt = PromptRequest::new(question, &loaded.catalog, loaded.examples.all()).render();

    let hour_block = "User Input: Sales, Number of item sold per store per day per HOUR per store for store AH2301, AH1080, AH5823 for Q2-2025\nSQL Query: SELECT\n    f.OMSCH AS Store_Name,\n    d.DATUM AS Date,\n    tv.UREN2 AS Hour_of_Day,\n    SUM(t.KLANTENBIJDRAGE) AS Total_Sales,\n    SUM(t.CE_AANTAL) AS Total_Items\nFROM L4TRANSACTIEREGEL t\nJOIN FILIAAL f ON t.FILA_ID = f.ID\nJOIN DAG d ON t.DAGE_ID = d.ID\nJOIN TIJDVAK tv ON t.TIJK_ID = tv.ID\nWHERE\n    d.JAAR_ID = 2025\n    AND d.KWAR_ID = 2\n    AND f.OMSCH IN ('AH2301', 'AH1080', 'AH5823')\nGROUP BY f.OMSCH, d.DATUM, tv.UREN2;";
    let half_hour_block = "User Input: Number of transactions per half hour per day per store AH2GO stores for Period 7 2025\nSQL Query: SELECT\n    f.OMSCH AS Store_Name,\n    d.DATUM AS Date,\n    tv.UREN_MINUTEN AS Time_Bucket,\n    COUNT(DISTINCT t.TRAN_ID_TR) AS Transaction_Count\nFROM L4TRANSACTIEREGEL t\nJOIN FILIAAL f ON t.FILA_ID = f.ID\nJOIN DAG d ON t.DAGE_ID = d.ID\nJOIN TIJDVAK tv ON t.TIJK_ID = tv.ID\nWHERE\n    d.JAAR_ID = 2025\n    AND d.PERI_ID = 7\n    AND f.OMSCH LIKE '%AH2GO%'\nGROUP BY f.OMSCH, d.DATUM, tv.UREN_MINUTEN;";
    let wag_block = "User Input: Sales, Number of item sold per store per day per WAG for AH2GO Franchise stores for week 45-2025\nSQL Query: SELECT\n    f.OMSCH AS Store_Name,\n    d.DATUM AS Date,\n    w.WAG_OMSCH AS Product_Group,\n    SUM(t.KLANTENBIJDRAGE) AS Total_Sales,\n    SUM(t.CE_AANTAL) AS Total_Items\nFROM L4TRANSACTIEREGEL t\nJOIN FILIAAL f ON t.FILA_ID = f.ID\nJOIN DAG d ON t.DAGE_ID = d.ID\nJOIN ARTIKEL a ON t.ARTI_ID = a.ID\nJOIN WAG w ON a.WAGF_ID = w.ID\nWHERE\n    d.JAAR_ID = 2025\n    AND d.WEEK_ID = 45\n    AND f.OMSCH LIKE '%AH2GO%'\n    AND f.FRANCHISE_IND = 'J'\nGROUP BY f.OMSCH, d.DATUM, w.WAG_OMSCH;";

    assert!(prompt.contains(hour_block));
    assert!(prompt.contains(half_hour_block));
    assert!(prompt.contains(wag_block));

    for table in [
        "l4transactieregel:\nSALES_FACTS_LINE_ITEMS: Individual items sold in a transaction.",
        "l4transactie:\nSALES_HEADERS: The total transaction/receipt summary (Basket level).",
        "artikel:\nPRODUCTS: Item details.",
        "filiaal:\nSTORES: Branch details.\n- OMSCH: Store Name/Code.\n- PLAATSNAAM: City.\n- FRANCHISE_IND: 'J' = Franchise.",
        "dag:\nDATE_DIMENSION: Calendar.",
        "tijdvak:\nTIME_DIMENSION: Time of day.\n- UREN2: Hour (0-23).",
        "wag:\nPRODUCT_GROUPS: High-level category (Warengroep).",
        "assortimentsgroep:\nASSORTMENT_GROUPS: A middle-layer product hierarchy.",
    ] {
        assert!(prompt.contains(table), "missing schema block: {table}");
    }
    assert!(prompt.contains(&loaded.catalog.render()));

    assert!(prompt.ends_with("\n\nUser Input: Sales per store for week 45 2025\nSQL Query:"));
}

#[test]
fn test_layout_is_preamble_examples_question() {
    let catalog = tiny_catalog();
    let examples = vec![
        Example::new("first", "SELECT 1 FROM dag"),
        Example::new("second", "SELECT 2 FROM dag"),
    ];
    let prompt = assemble("third", 7, &catalog, &examples);

    let expected_tail = "Below are some examples of how to solve questions:\n\n\
        User Input: first\nSQL Query: SELECT 1 FROM dag\n\n\
        User Input: second\nSQL Query: SELECT 2 FROM dag\n\n\
        User Input: third\nSQL Query:";
    assert!(prompt.ends_with(expected_tail), "unexpected layout:\n{prompt}");
    assert!(prompt.starts_with("You are a MySQL expert for the 'Pallas' retail system."));
    assert!(prompt.contains("limit the results to 7."));
    assert!(prompt.contains(
        "Here is the database schema you must use:\ndag:\nDATE_DIMENSION: Calendar.\n- JAAR_ID: Year."
    ));
    assert!(!prompt.contains("{result_limit}"));
    assert!(!prompt.contains("{schema}"));
}

#[test]
fn test_default_result_limit_is_used() {
    let catalog = tiny_catalog();
    let prompt = PromptRequest::new("q", &catalog, &[]).render();
    assert!(prompt.contains(&format!("limit the results to {DEFAULT_RESULT_LIMIT}.")));

    let prompt = PromptRequest::new("q", &catalog, &[])
        .with_result_limit(50)
        .render();
    assert!(prompt.contains("limit the results to 50."));
}

#[test]
fn test_question_is_not_treated_as_template() {
    let catalog = tiny_catalog();
    let prompt = assemble("show {schema} and {result_limit}", 3, &catalog, &[]);
    assert!(prompt.ends_with("User Input: show {schema} and {result_limit}\nSQL Query:"));
}

#[test]
fn test_empty_question_still_produces_prompt() {
    let loaded = bundled();
    let prompt = assemble("", 5, &loaded.catalog, loaded.examples.all());
    assert!(prompt.ends_with("\n\nUser Input: \nSQL Query:"));
}

#[test]
fn test_empty_example_bank_has_no_example_blocks() {
    let catalog = tiny_catalog();
    let bank = ExampleBank::new(Vec::new()).unwrap();
    let prompt = assemble("q", 5, &catalog, bank.all());
    assert!(prompt.ends_with("solve questions:\n\nUser Input: q\nSQL Query:"));
    assert_eq!(prompt.matches("User Input:").count(), 1);
}
