//! Read queries. Sales aggregates all run over [`SALES_FROM`] with the
//! filter's predicates; every aggregate is coalesced so no `NULL` escapes.

use retail_core::{
  filter::SalesFilter,
  report::{
    CategorySales, CountryCustomers, CountryRevenue, OrderMetrics, ProductRevenue,
    RepeatCustomer, StockAlert, StockLevel, TableCounts,
  },
};
use rusqlite::{Connection, params, params_from_iter, types::Value};

use crate::{
  encode::{RawInvoiceSummary, RawTrendPoint, repeat_customer},
  filter::{Predicates, SALES_FROM, UNCATEGORIZED},
};

const LINE_TOTAL: &str = "l.quantity * l.unit_price";

// ─── Reference reads ─────────────────────────────────────────────────────────

pub fn table_counts(conn: &Connection) -> rusqlite::Result<TableCounts> {
  let count = |table: &str| -> rusqlite::Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
  };
  Ok(TableCounts {
    country:      count("country")?,
    customer:     count("customer")?,
    product:      count("product")?,
    category:     count("category")?,
    invoice:      count("invoice")?,
    invoice_line: count("invoice_line")?,
    stock:        count("stock")?,
  })
}

pub fn date_bounds(conn: &Connection) -> rusqlite::Result<Option<(String, String)>> {
  let (min, max): (Option<String>, Option<String>) = conn.query_row(
    "SELECT MIN(date(invoice_date)), MAX(date(invoice_date)) FROM invoice",
    [],
    |r| Ok((r.get(0)?, r.get(1)?)),
  )?;
  Ok(min.zip(max))
}

pub fn invoice_dates(conn: &Connection) -> rusqlite::Result<Vec<String>> {
  let mut stmt =
    conn.prepare("SELECT DISTINCT date(invoice_date) AS day FROM invoice ORDER BY day")?;
  stmt
    .query_map([], |r| r.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()
}

pub fn total_sales(conn: &Connection) -> rusqlite::Result<f64> {
  conn.query_row(
    "SELECT COALESCE(SUM(quantity * unit_price), 0.0) FROM invoice_line",
    [],
    |r| r.get(0),
  )
}

pub fn distinct_names(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(sql)?;
  stmt
    .query_map([], |r| r.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()
}

// ─── Sales aggregates ────────────────────────────────────────────────────────

pub fn sales_trend(conn: &Connection, filter: &SalesFilter) -> rusqlite::Result<Vec<RawTrendPoint>> {
  let preds = Predicates::from(filter);
  let sql = format!(
    "SELECT date(i.invoice_date) AS day, COALESCE(SUM({LINE_TOTAL}), 0.0)
     {SALES_FROM}
     {where_clause}
     GROUP BY day
     ORDER BY day",
    where_clause = preds.where_clause(),
  );
  let mut stmt = conn.prepare(&sql)?;
  stmt
    .query_map(params_from_iter(preds.params()), |r| {
      Ok(RawTrendPoint { date: r.get(0)?, total_sales: r.get(1)? })
    })?
    .collect()
}

pub fn top_products(
  conn: &Connection,
  filter: &SalesFilter,
  limit: usize,
) -> rusqlite::Result<Vec<ProductRevenue>> {
  let preds = Predicates::from(filter);
  let sql = format!(
    "SELECT p.product_id, p.stock_code, p.description,
            COALESCE(SUM({LINE_TOTAL}), 0.0) AS revenue,
            COALESCE(SUM(l.quantity), 0)     AS units
     {SALES_FROM}
     {where_clause}
     GROUP BY p.product_id
     ORDER BY revenue DESC, p.product_id
     LIMIT ?",
    where_clause = preds.where_clause(),
  );
  let mut params = preds.params();
  params.push(Value::Integer(limit as i64));
  let mut stmt = conn.prepare(&sql)?;
  stmt
    .query_map(params_from_iter(params), |r| {
      Ok(ProductRevenue {
        product_id:   r.get(0)?,
        stock_code:   r.get(1)?,
        product_name: r.get(2)?,
        revenue:      r.get(3)?,
        quantity:     r.get(4)?,
      })
    })?
    .collect()
}

pub fn category_sales(conn: &Connection, filter: &SalesFilter) -> rusqlite::Result<Vec<CategorySales>> {
  let preds = Predicates::from(filter);
  let sql = format!(
    "SELECT COALESCE(cat.category_name, '{UNCATEGORIZED}') AS category,
            COALESCE(SUM({LINE_TOTAL}), 0.0) AS sales
     {SALES_FROM}
     {where_clause}
     GROUP BY category
     ORDER BY sales DESC, category",
    where_clause = preds.where_clause(),
  );
  let mut stmt = conn.prepare(&sql)?;
  stmt
    .query_map(params_from_iter(preds.params()), |r| {
      Ok(CategorySales { category: r.get(0)?, sales: r.get(1)? })
    })?
    .collect()
}

pub fn customers_by_country(
  conn: &Connection,
  filter: &SalesFilter,
) -> rusqlite::Result<Vec<CountryCustomers>> {
  let preds = Predicates::from(filter);
  let sql = format!(
    "SELECT co.country_name, COUNT(DISTINCT c.customer_id) AS customers
     {SALES_FROM}
     {where_clause}
     GROUP BY co.country_name
     ORDER BY customers DESC, co.country_name",
    where_clause = preds.where_clause(),
  );
  let mut stmt = conn.prepare(&sql)?;
  stmt
    .query_map(params_from_iter(preds.params()), |r| {
      Ok(CountryCustomers { country: r.get(0)?, count: r.get(1)? })
    })?
    .collect()
}

pub fn revenue_by_country(
  conn: &Connection,
  filter: &SalesFilter,
) -> rusqlite::Result<Vec<CountryRevenue>> {
  let preds = Predicates::from(filter);
  let sql = format!(
    "SELECT co.country_name, COALESCE(SUM({LINE_TOTAL}), 0.0) AS revenue
     {SALES_FROM}
     {where_clause}
     GROUP BY co.country_name
     ORDER BY revenue DESC, co.country_name",
    where_clause = preds.where_clause(),
  );
  let mut stmt = conn.prepare(&sql)?;
  stmt
    .query_map(params_from_iter(preds.params()), |r| {
      Ok(CountryRevenue { country: r.get(0)?, revenue: r.get(1)? })
    })?
    .collect()
}

pub fn order_metrics(conn: &Connection, filter: &SalesFilter) -> rusqlite::Result<OrderMetrics> {
  let preds = Predicates::from(filter);
  let sql = format!(
    "SELECT COUNT(*), COALESCE(SUM(total), 0.0), COALESCE(AVG(total), 0.0)
     FROM (
       SELECT i.invoice_no, SUM({LINE_TOTAL}) AS total
       {SALES_FROM}
       {where_clause}
       GROUP BY i.invoice_no
     )",
    where_clause = preds.where_clause(),
  );
  conn.query_row(&sql, params_from_iter(preds.params()), |r| {
    Ok(OrderMetrics {
      order_count:         r.get(0)?,
      total_sales:         r.get(1)?,
      average_order_value: r.get(2)?,
    })
  })
}

pub fn recent_invoices(
  conn: &Connection,
  filter: &SalesFilter,
  limit: usize,
) -> rusqlite::Result<Vec<RawInvoiceSummary>> {
  let preds = Predicates::from(filter);
  let sql = format!(
    "SELECT i.invoice_no, i.invoice_date, c.customer_id, co.country_name,
            COALESCE(SUM({LINE_TOTAL}), 0.0)
     {SALES_FROM}
     {where_clause}
     GROUP BY i.invoice_no
     ORDER BY i.invoice_date DESC, i.invoice_no DESC
     LIMIT ?",
    where_clause = preds.where_clause(),
  );
  let mut params = preds.params();
  params.push(Value::Integer(limit as i64));
  let mut stmt = conn.prepare(&sql)?;
  stmt
    .query_map(params_from_iter(params), |r| {
      Ok(RawInvoiceSummary {
        invoice_no:   r.get(0)?,
        invoice_date: r.get(1)?,
        customer_id:  r.get(2)?,
        country:      r.get(3)?,
        total_amount: r.get(4)?,
      })
    })?
    .collect()
}

pub fn repeat_customers(
  conn: &Connection,
  filter: &SalesFilter,
  limit: usize,
) -> rusqlite::Result<Vec<RepeatCustomer>> {
  let preds = Predicates::from(filter);
  let sql = format!(
    "SELECT c.customer_id, co.country_name,
            COUNT(DISTINCT i.invoice_no)     AS orders,
            COALESCE(SUM({LINE_TOTAL}), 0.0) AS spent
     {SALES_FROM}
     {where_clause}
     GROUP BY c.customer_id
     HAVING orders > 1
     ORDER BY orders DESC, spent DESC, c.customer_id
     LIMIT ?",
    where_clause = preds.where_clause(),
  );
  let mut params = preds.params();
  params.push(Value::Integer(limit as i64));
  let mut stmt = conn.prepare(&sql)?;
  stmt
    .query_map(params_from_iter(params), |r| {
      Ok(repeat_customer(r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
    })?
    .collect()
}

// ─── Inventory ───────────────────────────────────────────────────────────────

pub fn stock_alerts(
  conn: &Connection,
  threshold: i64,
  limit: usize,
) -> rusqlite::Result<Vec<StockAlert>> {
  let mut stmt = conn.prepare(
    "SELECT p.product_id, p.stock_code, p.description, s.quantity_in_stock
     FROM stock s
     JOIN product p ON p.product_id = s.product_id
     WHERE s.quantity_in_stock < ?1
     ORDER BY s.quantity_in_stock ASC, p.product_id
     LIMIT ?2",
  )?;
  stmt
    .query_map(params![threshold, limit as i64], |r| {
      let quantity_in_stock: i64 = r.get(3)?;
      Ok(StockAlert {
        product_id: r.get(0)?,
        stock_code: r.get(1)?,
        product_name: r.get(2)?,
        quantity_in_stock,
        level: StockLevel::for_quantity(quantity_in_stock),
      })
    })?
    .collect()
}
