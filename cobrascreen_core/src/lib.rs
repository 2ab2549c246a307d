//! Core of cobrascreen, a crate for constraint based screening of metabolic models.
//!
//! Models are read from COBRA JSON files ([`io::json`]), solved as flux balance
//! problems ([`optimize`]), and screened for essential genes ([`essentiality`]) with
//! every knockout reverted through a scoped [`metabolic_model::context::ModelContext`].
//! Heterologous expression burdens can be added to a model with [`vector`].

pub mod configuration;
pub mod essentiality;
pub mod io;
pub mod metabolic_model;
pub mod optimize;
pub mod timing;
pub mod vector;

#[cfg(test)]
mod test_models;
