mod common;

mod apply;
mod complete;
mod rating;
