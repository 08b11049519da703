#![allow(dead_code)]

use serde_json::{Value, json};

/// A complete analysis form as produced by the digitization pipeline.
pub fn analysis_form() -> Value {
    json!({
        "company_name": "GreenGrow Inc.",
        "company_address": "123 Green Road, Farmville, State, 12345",
        "company_website": "https://www.greengrow.com",
        "company_phone_number": "123-456-7890",
        "manufacturer_name": "AgroTech Industries Ltd.",
        "manufacturer_address": "456 Industrial Park, Manufacture City, 67890",
        "manufacturer_website": "https://www.agrotech.com",
        "manufacturer_phone_number": "987-654-3210",
        "fertiliser_name": "SuperGrow 20-20-20",
        "registration_number": "2018007A",
        "lot_number": "L987654321",
        "weight": [
            {"value": "25", "unit": "kg"},
            {"value": "55", "unit": "lb"}
        ],
        "density": {"value": "1.2", "unit": "g/cm"},
        "volume": {"value": "20.8", "unit": "L"},
        "npk": "20-20-20",
        "warranty": "Guaranteed analysis of nutrients.",
        "cautions_en": [
            "Keep out of reach of children.",
            "Avoid contact with skin and eyes."
        ],
        "instructions_en": [
            "1. Dissolve 50g in 10L of water.",
            "2. Apply every 2 weeks.",
            "3. Store in a cool, dry place."
        ],
        "micronutrients_en": [
            {"nutrient": "Iron (Fe)", "value": "0.10", "unit": "%"},
            {"nutrient": "Zinc (Zn)", "value": "0.05", "unit": "%"},
            {"nutrient": "Manganese (Mn)", "value": "0.05", "unit": "%"}
        ],
        "ingredients_en": [
            {"nutrient": "Bone meal", "value": "5", "unit": "%"},
            {"nutrient": "Seaweed extract", "value": "3", "unit": "%"},
            {"nutrient": "Humic acid", "value": "2", "unit": "%"}
        ],
        "specifications_en": [
            {"humidity": "10", "ph": "6.5", "solubility": "100"}
        ],
        "first_aid_en": [
            "In case of contact with eyes, rinse immediately with plenty of water and seek medical advice."
        ],
        "cautions_fr": [
            "Tenir hors de portée des enfants.",
            "Éviter le contact avec la peau et les yeux."
        ],
        "instructions_fr": [
            "1. Dissoudre 50g dans 10L d'eau.",
            "2. Appliquer toutes les 2 semaines.",
            "3. Conserver dans un endroit frais et sec."
        ],
        "micronutrients_fr": [
            {"nutrient": "Fer (Fe)", "value": "0.10", "unit": "%"},
            {"nutrient": "Zinc (Zn)", "value": "0.05", "unit": "%"},
            {"nutrient": "Manganèse (Mn)", "value": "0.05", "unit": "%"}
        ],
        "ingredients_fr": [
            {"nutrient": "Farine d'os", "value": "5", "unit": "%"},
            {"nutrient": "Extrait d'algues", "value": "3", "unit": "%"},
            {"nutrient": "Acide humique", "value": "2", "unit": "%"}
        ],
        "specifications_fr": [
            {"humidity": "10", "ph": "6.5", "solubility": "100"}
        ],
        "first_aid_fr": [
            "En cas de contact avec les yeux, rincer immédiatement à l'eau et consulter un médecin."
        ],
        "guaranteed_analysis": [
            {"nutrient": "Total Nitrogen (N)", "value": "20", "unit": "%"},
            {"nutrient": "Available Phosphate (P2O5)", "value": "20", "unit": "%"},
            {"nutrient": "Soluble Potash (K2O)", "value": "20", "unit": "%"}
        ]
    })
}

/// Replaces one field of a form.
pub fn with_field(mut form: Value, key: &str, value: Value) -> Value {
    form[key] = value;
    form
}
