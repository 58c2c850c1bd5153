use memquery::*;

fn main() -> Result<()> {
    println!("In-Memory Query Engine Demo\n");

    // Create DB
    let db = Database::new();

    db.create_table(
        "customer",
        Schema::new(vec![
            ColumnDef::new("id", DataType::Int).not_null(),
            ColumnDef::new("name", DataType::Text),
            ColumnDef::new("since", DataType::Date),
        ]),
    )?;
    db.create_table(
        "orders",
        Schema::new(vec![
            ColumnDef::new("id", DataType::Int).not_null(),
            ColumnDef::new("customer_id", DataType::Int),
            ColumnDef::new("total", DataType::Decimal),
        ]),
    )?;
    println!("Created tables {:?}", db.store().table_names());

    // Insert data
    println!("Inserting data...");
    db.insert(
        "customer",
        vec![Value::Int(1), Value::Text("Alice".into()), DataType::Date.convert("{d '2016-05-15'}")?],
    )?;
    db.insert(
        "customer",
        vec![Value::Int(2), Value::Text("Bob".into()), Value::Null], // Bob's signup date is unknown
    )?;
    for (id, customer, total) in [(10, 1, "19.90"), (11, 2, "5.00"), (12, 1, "120.50")] {
        db.insert(
            "orders",
            vec![Value::Int(id), Value::Int(customer), DataType::Decimal.convert(total)?],
        )?;
    }
    println!("Inserted 5 rows\n");

    let sql = "select c.name, o.total from customer c join orders o on o.customer_id = c.id \
               where o.total > 10 order by o.total desc";
    println!("{sql}\n");
    let result = db.query(sql)?;

    // Printing data
    println!("{}", result.columns.iter().map(|c| format!("{c:<15}")).collect::<String>());
    println!("{}", "-".repeat(30));
    for row in &result.rows {
        println!("{}", row.iter().map(|v| format!("{:<15}", v.to_string())).collect::<String>());
    }
    println!();

    let next = db.query("select NextId(\"orders\")")?;
    println!("Next order id: {}", next.rows[0][0]);

    Ok(())
}
