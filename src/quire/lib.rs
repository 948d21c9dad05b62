//! # Quire Architecture
//!
//! Quire builds server-side pages out of a tree of *writables* (pages,
//! sections, forms, tables, rows, fields, filters) and renders that tree more
//! than one way. It is a library first; the `quire` binary is a thin client
//! that renders JSON records from the command line.
//!
//! ## Two Passes Over One Tree
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Page::render(request, config)                              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Initializer (initializer.rs)                               │
//! │  - Positional suffixes on every field                       │
//! │  - On POST: validate forms once, fire on_valid/on_invalid   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Render function, chosen by PageType (page.rs)              │
//! │  - HTML / ajax / markdown: HtmlWriter (writer/)             │
//! │  - PDF: the same HTML plus a document name                  │
//! │  - Excel: one Workbook sheet per Table (writer/excel.rs)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both passes are [`visitor::Visitor`]s. The node kinds form the closed
//! [`writable::Writable`] enum, so every visitor handles every kind.
//!
//! ## Data Before the Tree
//!
//! Tables get their rows from a [`query::Query`] narrowed by a
//! [`filter::FilterChain`]. Statements the query can express are pushed into
//! it; once one names a field the query does not have, that statement and
//! every later one run over the materialized rows instead. See `filter/` for
//! the ordering rules.
//!
//! ## No Ambient State
//!
//! The request (method and submitted pairs) and the configuration are passed
//! in explicitly. Nothing in the library reads process globals, writes to
//! stdout, or exits.
//!
//! ## Module Overview
//!
//! - `value`: dynamic scalar shared by queries, fields and criteria
//! - `query/`: the data-layer traits and an in-memory implementation
//! - `field`, `row`: fields, field bearers and table rows
//! - `filter/`: statements, stages and chains
//! - `form`, `table`: forms, tables and table forms with their validation
//! - `writable`, `visitor`, `initializer`: the tree and its traversals
//! - `writer/`: HTML templates and the spreadsheet model
//! - `page`: the root writable and render dispatch
//! - `config`, `error`, `request`: ambient types

pub mod config;
pub mod error;
pub mod field;
pub mod filter;
pub mod form;
pub mod initializer;
pub mod page;
pub mod query;
pub mod request;
pub mod row;
pub mod table;
pub mod value;
pub mod visitor;
pub mod writable;
pub mod writer;
