pub mod kucoin;
pub mod mexc;
pub mod phemex;
