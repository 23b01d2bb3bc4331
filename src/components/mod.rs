pub mod editor_panel;
pub mod fixture_list;
pub mod round_header;
