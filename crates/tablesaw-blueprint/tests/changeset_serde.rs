//! Change sets are plain data and round-trip through serde.

use tablesaw_blueprint::prelude::*;

fn populated_changeset() -> ChangeSet {
    Blueprint::session(
        "invoices",
        TableMode::Alter,
        BlueprintConfig::new().default_string_length(191),
        |table| {
            table.string("reference");
            table.unique()?;
            table.decimal("total", 17, 6);
            table.enumeration("state", &["open", "paid", "void"]);
            table.foreign("company_id")?.references("id")?.on("companies")?;
            table.on_delete(ForeignKeyAction::Restrict)?;
            table.drop_foreign(&["customer_id"]);
            table.rename_column("memo", "note");
            Ok(())
        },
    )
    .unwrap()
}

#[test]
fn changeset_round_trips_through_json() {
    let changeset = populated_changeset();
    let json = serde_json::to_string(&changeset).unwrap();
    let back: ChangeSet = serde_json::from_str(&json).unwrap();
    assert_eq!(changeset, back);
}

#[test]
fn serialized_changeset_keeps_derived_names() {
    let changeset = populated_changeset();
    let json = serde_json::to_string(&changeset).unwrap();
    assert!(json.contains("reference_unique"));
    assert!(json.contains("invoices_company_id_foreign"));
    assert!(json.contains("invoices_customer_id_foreign"));
}
