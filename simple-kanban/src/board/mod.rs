//! Board operations: assembling the full column/card view

mod get;

pub use get::{
    AssigneeFilterOption, BoardView, CardView, ColumnToggle, ColumnView, GetBoard, ParentOption,
};
