//! Prompt templates for LLM interactions.

/// System prompt shared by all providers.
pub fn system_prompt() -> &'static str {
    "You are a precise assistant that reads supplier price lists. \
     You answer with a single JSON object and nothing else."
}

/// Build the column-role prompt for a tab-separated table preview.
///
/// The first line of `table_tsv` is the header row.
pub fn column_roles_prompt(table_tsv: &str) -> String {
    format!(
        r#"Analyze the table below. Determine the column indexes (0-based, the first column is 0).
Return ONLY valid JSON without explanations:
{{
  "name_idx": <index of the column with the product name>,
  "price_idx": <index of the column with the unit price or cost>,
  "unit_idx": <index of the column with the unit of measure (pcs, kg, l, m...), or -1 if none>,
  "qty_idx": <index of the column with the quantity, or -1 if none>
}}
Use -1 for any column that is not present. Headers may be in Russian; consider synonyms:
Цена, Стоимость, Прайс, Цена за ед. (price); Наименование, Товар, Номенклатура (name);
Количество, Кол-во, Кол. (quantity); Ед. изм., Единица (unit).

Table:
{}"#,
        table_tsv
    )
}
