//! SQL schema for the retail SQLite store.
//!
//! Executed at every connection startup. `PRAGMA user_version` records the
//! layout so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS country (
    country_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    country_name  TEXT NOT NULL UNIQUE
);

-- customer_id is the identifier found in the source data.
CREATE TABLE IF NOT EXISTS customer (
    customer_id  INTEGER PRIMARY KEY,
    country_id   INTEGER NOT NULL REFERENCES country(country_id)
);

-- product_id is assigned by the importer in first-seen order.
CREATE TABLE IF NOT EXISTS product (
    product_id   INTEGER PRIMARY KEY,
    stock_code   TEXT NOT NULL UNIQUE,
    description  TEXT NOT NULL
);

-- stock_code is a lookup key into product, deliberately not a foreign key.
CREATE TABLE IF NOT EXISTS category (
    category_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    category_name  TEXT NOT NULL,
    stock_code     TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS invoice (
    invoice_no    TEXT PRIMARY KEY,
    invoice_date  TEXT NOT NULL,    -- 'YYYY-MM-DD HH:MM:SS'
    customer_id   INTEGER NOT NULL REFERENCES customer(customer_id)
);

CREATE TABLE IF NOT EXISTS invoice_line (
    line_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    invoice_no  TEXT NOT NULL REFERENCES invoice(invoice_no),
    product_id  INTEGER NOT NULL REFERENCES product(product_id),
    quantity    INTEGER NOT NULL,
    unit_price  REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS stock (
    product_id         INTEGER PRIMARY KEY REFERENCES product(product_id),
    quantity_in_stock  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS invoice_date_idx         ON invoice(invoice_date);
CREATE INDEX IF NOT EXISTS invoice_customer_idx     ON invoice(customer_id);
CREATE INDEX IF NOT EXISTS invoice_line_invoice_idx ON invoice_line(invoice_no);
CREATE INDEX IF NOT EXISTS invoice_line_product_idx ON invoice_line(product_id);

PRAGMA user_version = 1;
";

/// Drops every table, children first. Run with foreign keys disabled.
pub const DROP_ALL: &str = "
DROP TABLE IF EXISTS stock;
DROP TABLE IF EXISTS invoice_line;
DROP TABLE IF EXISTS invoice;
DROP TABLE IF EXISTS category;
DROP TABLE IF EXISTS product;
DROP TABLE IF EXISTS customer;
DROP TABLE IF EXISTS country;
";

/// Empties every table and resets the AUTOINCREMENT counters so a re-import
/// reproduces the same surrogate ids.
pub const CLEAR_ALL: &str = "
DELETE FROM invoice_line;
DELETE FROM invoice;
DELETE FROM stock;
DELETE FROM category;
DELETE FROM product;
DELETE FROM customer;
DELETE FROM country;
DELETE FROM sqlite_sequence WHERE name IN ('country', 'category', 'invoice_line');
";
