pub mod d404_campus_pulse;
