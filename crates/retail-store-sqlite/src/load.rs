//! Import phases. Each function runs inside a single transaction that is
//! committed on success and rolled back (by drop) on any error.

use retail_core::model::{
  Country, Customer, Invoice, NewCategory, NewInvoiceLine, Product, StockMultiplier,
};
use rusqlite::{Connection, params};

use crate::{
  encode::encode_datetime,
  schema::{CLEAR_ALL, DROP_ALL, SCHEMA},
};

pub fn clear(conn: &mut Connection) -> rusqlite::Result<()> {
  conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
  let cleared = (|| {
    let tx = conn.transaction()?;
    tx.execute_batch(CLEAR_ALL)?;
    tx.commit()
  })();
  conn.execute_batch("PRAGMA foreign_keys = ON;")?;
  cleared
}

pub fn reset(conn: &mut Connection) -> rusqlite::Result<()> {
  conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
  let dropped = (|| {
    let tx = conn.transaction()?;
    tx.execute_batch(DROP_ALL)?;
    tx.commit()
  })();
  conn.execute_batch("PRAGMA foreign_keys = ON;")?;
  dropped?;
  conn.execute_batch(SCHEMA)
}

pub fn countries(conn: &mut Connection, names: Vec<String>) -> rusqlite::Result<Vec<Country>> {
  let tx = conn.transaction()?;
  let mut out = Vec::with_capacity(names.len());
  {
    let mut stmt = tx.prepare("INSERT INTO country (country_name) VALUES (?1)")?;
    for country_name in names {
      stmt.execute(params![country_name])?;
      out.push(Country { country_id: tx.last_insert_rowid(), country_name });
    }
  }
  tx.commit()?;
  Ok(out)
}

pub fn customers(conn: &mut Connection, customers: Vec<Customer>) -> rusqlite::Result<u64> {
  let tx = conn.transaction()?;
  let mut n = 0;
  {
    let mut stmt =
      tx.prepare("INSERT INTO customer (customer_id, country_id) VALUES (?1, ?2)")?;
    for c in &customers {
      n += stmt.execute(params![c.customer_id, c.country_id])? as u64;
    }
  }
  tx.commit()?;
  Ok(n)
}

pub fn products(conn: &mut Connection, products: Vec<Product>) -> rusqlite::Result<u64> {
  let tx = conn.transaction()?;
  let mut n = 0;
  {
    let mut stmt = tx.prepare(
      "INSERT INTO product (product_id, stock_code, description) VALUES (?1, ?2, ?3)",
    )?;
    for p in &products {
      n += stmt.execute(params![p.product_id, p.stock_code, p.description])? as u64;
    }
  }
  tx.commit()?;
  Ok(n)
}

pub fn categories(conn: &mut Connection, categories: Vec<NewCategory>) -> rusqlite::Result<u64> {
  let tx = conn.transaction()?;
  let mut n = 0;
  {
    let mut stmt =
      tx.prepare("INSERT INTO category (category_name, stock_code) VALUES (?1, ?2)")?;
    for c in &categories {
      n += stmt.execute(params![c.category_name, c.stock_code])? as u64;
    }
  }
  tx.commit()?;
  Ok(n)
}

pub fn invoices(conn: &mut Connection, invoices: Vec<Invoice>) -> rusqlite::Result<u64> {
  let tx = conn.transaction()?;
  let mut n = 0;
  {
    let mut stmt = tx.prepare(
      "INSERT INTO invoice (invoice_no, invoice_date, customer_id) VALUES (?1, ?2, ?3)",
    )?;
    for inv in &invoices {
      n += stmt.execute(params![
        inv.invoice_no,
        encode_datetime(inv.invoice_date),
        inv.customer_id,
      ])? as u64;
    }
  }
  tx.commit()?;
  Ok(n)
}

pub fn invoice_lines(conn: &mut Connection, lines: Vec<NewInvoiceLine>) -> rusqlite::Result<u64> {
  let tx = conn.transaction()?;
  let mut n = 0;
  {
    let mut stmt = tx.prepare(
      "INSERT INTO invoice_line (invoice_no, product_id, quantity, unit_price)
       VALUES (?1, ?2, ?3, ?4)",
    )?;
    for line in &lines {
      n += stmt.execute(params![
        line.invoice_no,
        line.product_id,
        line.quantity,
        line.unit_price,
      ])? as u64;
    }
  }
  tx.commit()?;
  Ok(n)
}

pub fn stock(conn: &mut Connection, multiplier: StockMultiplier) -> rusqlite::Result<u64> {
  let tx = conn.transaction()?;
  let totals: Vec<(i64, i64)> = {
    let mut stmt = tx.prepare(
      "SELECT p.product_id, COALESCE(SUM(l.quantity), 0)
       FROM product p
       LEFT JOIN invoice_line l ON l.product_id = p.product_id
       GROUP BY p.product_id
       ORDER BY p.product_id",
    )?;
    stmt
      .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };
  {
    let mut stmt = tx.prepare(
      "INSERT OR REPLACE INTO stock (product_id, quantity_in_stock) VALUES (?1, ?2)",
    )?;
    for (product_id, total_sold) in &totals {
      stmt.execute(params![product_id, multiplier.initial_stock(*total_sold)])?;
    }
  }
  tx.commit()?;
  Ok(totals.len() as u64)
}
