pub mod groupie;
