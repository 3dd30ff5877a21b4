//! Built-in food composition table
//!
//! Twenty common Brazilian foods from TACO (Tabela Brasileira de Composição de
//! Alimentos) and the IBGE 2025 survey tables. Values are per 100 g.

use crate::models::{FoodRecord, FoodSource, Macros, Micronutrients};

/// Read-only reference table, ordered by id
#[derive(Debug, Clone)]
pub struct FoodTable {
    foods: Vec<FoodRecord>,
}

fn food(id: i64, name: &str, source: FoodSource, macros: [f64; 4], micros: Micronutrients) -> FoodRecord {
    let [calories, protein, carbs, fat] = macros;
    FoodRecord::new(id, name, source, Macros::new(calories, protein, carbs, fat)).with_micros(micros)
}

impl FoodTable {
    /// Wrap an existing list of records
    pub fn new(mut foods: Vec<FoodRecord>) -> Self {
        foods.sort_by_key(|f| f.id);
        Self { foods }
    }

    /// The table shipped with the application
    pub fn builtin() -> Self {
        use FoodSource::{Ibge2025, Taco};

        let none = Micronutrients::default();
        Self::new(vec![
            food(1, "Arroz, branco, cozido", Taco, [128.0, 2.5, 28.1, 0.2], Micronutrients {
                fiber: Some(0.9), sodium: Some(1.0), calcium: Some(3.0), iron: Some(0.1), ..none
            }),
            food(2, "Feijão, carioca, cozido", Taco, [76.0, 4.8, 13.6, 0.5], Micronutrients {
                fiber: Some(8.5), sodium: Some(2.0), calcium: Some(27.0), iron: Some(1.5), zinc: Some(0.6), ..none
            }),
            food(3, "Frango, filé, grelhado", Taco, [165.0, 31.0, 0.0, 3.6], Micronutrients {
                sodium: Some(74.0), iron: Some(0.7), ..none
            }),
            food(4, "Carne, bovina, contra-filé, grelhado", Taco, [215.0, 31.0, 0.0, 9.0], Micronutrients {
                sodium: Some(60.0), iron: Some(2.5), zinc: Some(7.5), ..none
            }),
            food(5, "Ovo, de galinha, cozido", Taco, [155.0, 13.0, 1.1, 11.0], Micronutrients {
                sodium: Some(124.0), vitamin_a: Some(149.0), vitamin_d: Some(2.2), ..none
            }),
            food(6, "Batata, inglesa, cozida", Ibge2025, [86.0, 2.0, 20.0, 0.1], Micronutrients {
                fiber: Some(2.2), vitamin_c: Some(9.6), sodium: Some(6.0), ..none
            }),
            food(7, "Alface, crespa, crua", Taco, [15.0, 1.4, 2.9, 0.2], Micronutrients {
                fiber: Some(1.3), vitamin_a: Some(370.0), vitamin_k: Some(102.0), ..none
            }),
            food(8, "Tomate, cru", Taco, [18.0, 0.9, 3.9, 0.2], Micronutrients {
                fiber: Some(1.2), vitamin_c: Some(14.0), vitamin_a: Some(42.0), ..none
            }),
            food(9, "Maçã, fuji, com casca", Taco, [56.0, 0.3, 14.0, 0.2], Micronutrients {
                fiber: Some(2.4), vitamin_c: Some(4.6), ..none
            }),
            food(10, "Banana, nanica, crua", Taco, [89.0, 1.1, 22.8, 0.3], Micronutrients {
                fiber: Some(2.6), calcium: Some(5.0), iron: Some(0.3), ..none
            }),
            food(11, "Pão, de forma, integral", Ibge2025, [246.0, 9.1, 49.0, 4.2], Micronutrients {
                fiber: Some(7.0), sodium: Some(491.0), ..none
            }),
            food(12, "Queijo, minas frescal", Taco, [264.0, 17.4, 1.7, 20.2], Micronutrients {
                sodium: Some(593.0), calcium: Some(579.0), ..none
            }),
            food(13, "Leite, integral", Taco, [61.0, 3.3, 4.8, 3.3], Micronutrients {
                calcium: Some(125.0), vitamin_d: Some(1.3), ..none
            }),
            food(14, "Azeite de oliva, extra virgem", Taco, [884.0, 0.0, 0.0, 100.0], Micronutrients {
                vitamin_e: Some(14.4), vitamin_k: Some(60.2), ..none
            }),
            food(15, "Brócolis, cozido", Ibge2025, [34.0, 2.8, 6.6, 0.4], Micronutrients {
                fiber: Some(2.6), vitamin_c: Some(89.2), vitamin_k: Some(101.6), ..none
            }),
            food(16, "Salmão, grelhado", Ibge2025, [208.0, 20.0, 0.0, 13.0], Micronutrients {
                vitamin_d: Some(13.6), sodium: Some(59.0), ..none
            }),
            food(17, "Abacate, cru", Taco, [160.0, 2.0, 8.5, 15.0], Micronutrients {
                fiber: Some(6.7), vitamin_k: Some(21.0), ..none
            }),
            food(18, "Mamão, formosa", Taco, [45.0, 0.5, 11.6, 0.1], Micronutrients {
                fiber: Some(1.8), vitamin_a: Some(108.0), vitamin_c: Some(82.2), ..none
            }),
            food(19, "Laranja, pera", Taco, [47.0, 0.9, 12.0, 0.1], Micronutrients {
                fiber: Some(2.4), vitamin_c: Some(53.2), ..none
            }),
            food(20, "Iogurte, natural, integral", Ibge2025, [61.0, 3.5, 4.7, 3.3], Micronutrients {
                calcium: Some(121.0), ..none
            }),
        ])
    }

    pub fn all(&self) -> &[FoodRecord] {
        &self.foods
    }

    pub fn get(&self, id: i64) -> Option<&FoodRecord> {
        self.foods
            .binary_search_by_key(&id, |f| f.id)
            .ok()
            .map(|idx| &self.foods[idx])
    }

    /// Case-insensitive substring search on the name.
    ///
    /// A blank term returns nothing rather than the whole table.
    pub fn search(&self, term: &str) -> Vec<&FoodRecord> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.foods
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&term))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

impl Default for FoodTable {
    fn default() -> Self {
        Self::builtin()
    }
}
