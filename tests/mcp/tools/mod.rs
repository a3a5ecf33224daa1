mod catalogs;
mod config;
mod translate;
