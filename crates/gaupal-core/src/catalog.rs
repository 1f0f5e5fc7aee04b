//! Canonical class-name catalogs for the deployed models.
//!
//! Index N in a catalog is class id N of the corresponding model, so the
//! ordering here is load-bearing and must never change. Several entries keep
//! spellings from the original training data (`Mastititis`, `healthycows`,
//! `diffculty_breath`, ...); they are part of the wire contract.

/// Number of cattle breeds recognized by the identification model
pub const NUM_BREEDS: usize = 41;

/// Breed names for the cow identification model (41 classes)
pub const BREED_NAMES: [&str; NUM_BREEDS] = [
    "Alambadi",
    "Amritmahal",
    "Ayrshire",
    "Banni",
    "Bargur",
    "Bhadawari",
    "Brown_Swiss",
    "Dangi",
    "Deoni",
    "Gir",
    "Guernsey",
    "Hallikar",
    "Hariana",
    "Holstein_Friesian",
    "Jaffrabadi",
    "Jersey",
    "Kangayam",
    "Kankrej",
    "Kasargod",
    "Kenkatha",
    "Kherigarh",
    "Khillari",
    "Krishna_Valley",
    "Malnad_gidda",
    "Mehsana",
    "Murrah",
    "Nagori",
    "Nagpuri",
    "Nili_Ravi",
    "Nimari",
    "Ongole",
    "Pulikulam",
    "Rathi",
    "Red_Dane",
    "Red_Sindhi",
    "Sahiwal",
    "Surti",
    "Tharparkar",
    "Toda",
    "Umblachery",
    "Vechur",
];

/// Number of skin/health conditions recognized by the disease detection model
pub const NUM_SKIN_CONDITIONS: usize = 16;

/// Condition names for the image-based disease detection model (16 classes)
pub const SKIN_CONDITION_NAMES: [&str; NUM_SKIN_CONDITIONS] = [
    "Abscess",
    "Actinomycosis",
    "Bovine Dermatophilosis (Rain Rot)",
    "Bovine Warts",
    "Bovine spongiform encephalopathy (BSE)",
    "Dermatophytosis",
    "Digital Dermatitis(also causes lameness)",
    "Foot and Mouth Disease",
    "Hoof Rot",
    "Lumpy Skin Diseases",
    "Mange",
    "Mastititis",
    "Pediculosis",
    "Photosensitization",
    "Pink Eye",
    "healthycows",
];

/// Number of symptoms in the Q&A model's input vocabulary
pub const NUM_SYMPTOMS: usize = 92;

/// Symptom vocabulary for the disease Q&A model, in training order (92 entries)
pub const SYMPTOM_NAMES: [&str; NUM_SYMPTOMS] = [
    "anorexia",
    "abdominal_pain",
    "anaemia",
    "abortions",
    "acetone",
    "aggression",
    "arthrogyposis",
    "ankylosis",
    "anxiety",
    "bellowing",
    "blood_loss",
    "blood_poisoning",
    "blisters",
    "colic",
    "Condemnation_of_livers",
    "coughing",
    "depression",
    "discomfort",
    "dyspnea",
    "dysentery",
    "diarrhoea",
    "dehydration",
    "drooling",
    "dull",
    "decreased_fertility",
    "diffculty_breath",
    "emaciation",
    "encephalitis",
    "fever",
    "facial_paralysis",
    "frothing_of_mouth",
    "frothing",
    "gaseous_stomach",
    "highly_diarrhoea",
    "high_pulse_rate",
    "high_temp",
    "high_proportion",
    "hyperaemia",
    "hydrocephalus",
    "isolation_from_herd",
    "infertility",
    "intermittent_fever",
    "jaundice",
    "ketosis",
    "loss_of_appetite",
    "lameness",
    "lack_of-coordination",
    "lethargy",
    "lacrimation",
    "milk_flakes",
    "milk_watery",
    "milk_clots",
    "mild_diarrhoea",
    "moaning",
    "mucosal_lesions",
    "milk_fever",
    "nausea",
    "nasel_discharges",
    "oedema",
    "pain",
    "painful_tongue",
    "pneumonia",
    "photo_sensitization",
    "quivering_lips",
    "reduction_milk_vields",
    "rapid_breathing",
    "rumenstasis",
    "reduced_rumination",
    "reduced_fertility",
    "reduced_fat",
    "reduces_feed_intake",
    "raised_breathing",
    "stomach_pain",
    "salivation",
    "stillbirths",
    "shallow_breathing",
    "swollen_pharyngeal",
    "swelling",
    "saliva",
    "swollen_tongue",
    "tachycardia",
    "torticollis",
    "udder_swelling",
    "udder_heat",
    "udder_hardeness",
    "udder_redness",
    "udder_pain",
    "unwillingness_to_move",
    "ulcers",
    "vomiting",
    "weight_loss",
    "weakness",
];

/// Number of diseases the Q&A model can predict
pub const NUM_SYMPTOM_DISEASES: usize = 26;

/// Disease names for the symptom-based Q&A model (26 classes)
pub const SYMPTOM_DISEASE_NAMES: [&str; NUM_SYMPTOM_DISEASES] = [
    "Mastitis",
    "Blackleg",
    "Bloat",
    "Coccidiosis",
    "Cryptosporidiosis",
    "Displaced Abomasum",
    "Gut Worms",
    "Listeriosis",
    "Liver Fluke",
    "Necrotic Enteritis",
    "Peri Weaning Diarrhoea",
    "Rift Valley Fever",
    "Rumen Acidosis",
    "Traumatic Reticulitis",
    "Calf Diphtheria",
    "Foot Rot",
    "Foot and Mouth",
    "Ragwort Poisoning",
    "Wooden Tongue",
    "Infectious Bovine Rhinotracheitis",
    "Acetonaemia",
    "Fatty Liver Syndrome",
    "Calf Pneumonia",
    "Schmallenberg Virus",
    "Trypanosomosis",
    "Fog Fever",
];

/// Get the position of a label in a catalog (case-sensitive exact match)
pub fn position_of(names: &[&str], label: &str) -> Option<usize> {
    names.iter().position(|&n| n == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(BREED_NAMES.len(), NUM_BREEDS);
        assert_eq!(SKIN_CONDITION_NAMES.len(), NUM_SKIN_CONDITIONS);
        assert_eq!(SYMPTOM_NAMES.len(), NUM_SYMPTOMS);
        assert_eq!(SYMPTOM_DISEASE_NAMES.len(), NUM_SYMPTOM_DISEASES);
    }

    #[test]
    fn test_breed_catalog_order() {
        assert_eq!(BREED_NAMES[0], "Alambadi");
        assert_eq!(BREED_NAMES[13], "Holstein_Friesian");
        assert_eq!(BREED_NAMES[40], "Vechur");
    }

    #[test]
    fn test_historical_spellings_preserved() {
        // These spellings come from the training data and must not be fixed.
        assert_eq!(SKIN_CONDITION_NAMES[11], "Mastititis");
        assert_eq!(SKIN_CONDITION_NAMES[15], "healthycows");
        assert_eq!(position_of(&SYMPTOM_NAMES, "diffculty_breath"), Some(25));
        assert_eq!(position_of(&SYMPTOM_NAMES, "reduction_milk_vields"), Some(64));
    }

    #[test]
    fn test_position_of() {
        assert_eq!(position_of(&SYMPTOM_NAMES, "anorexia"), Some(0));
        assert_eq!(position_of(&SYMPTOM_NAMES, "weakness"), Some(91));
        assert_eq!(position_of(&SYMPTOM_NAMES, "Fever"), None);
        assert_eq!(position_of(&SYMPTOM_DISEASE_NAMES, "Fog Fever"), Some(25));
    }
}
