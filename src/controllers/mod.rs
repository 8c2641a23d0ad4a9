pub mod score_controller;
