// detoxic: toxic comment classification over HTTP
//
// This is the library root. The prediction pipeline runs
// text → tokenizer → inference → service, and web exposes it.

pub mod config;
pub mod inference;
pub mod service;
pub mod text;
pub mod tokenizer;
pub mod trusted;
pub mod web;
