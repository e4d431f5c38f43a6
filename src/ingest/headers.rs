//! Static alias tables, one constant per canonical field.
//!
//! Order inside `names` is priority order for the exact pass. Positional keys
//! (`col_Z`, `col_Q`) are listed where the column position has been stable
//! across form versions.

use super::alias::Aliases;
use super::role::RoleMarkers;

const EMAIL: Aliases = Aliases::new(&["email", "E-mail", "e-mail", "Email"]);

const MARKERS: RoleMarkers = RoleMarkers {
    pastor: Aliases::new(&["Ps", "ps"]),
    deacon: Aliases::new(&["Dic", "dic"]),
    worker: Aliases::new(&["ob", "Ob"]),
    member: Aliases::new(&["Mem", "mem"]),
};

/// Letters sheet (`CARTAS_DB` and friends).
pub mod letter {
    use super::{Aliases, RoleMarkers};

    pub const EMITTED_AT: Aliases = Aliases::with_legacy(
        &["Carimbo de data/hora", "carimbo_de_data/hora", "data_emissao"],
        &["data_emissÃ£o"],
    );
    pub const REGION: Aliases = Aliases::with_legacy(
        &["Qual região Pertence", "qual_região_pertence", "regiao", "região"],
        &["Qual regiÃ£o Pertence", "qual_regiÃ£o_pertence"],
    );
    pub const ORIGIN_CHURCH: Aliases = Aliases::with_legacy(
        &[
            "Qual Igreja Você Pertence?",
            "qual_igreja_você_pertence?",
            "igreja_origem",
            "Qual Igreja Estadual?",
        ],
        &["Qual Igreja VocÃª Pertence?", "qual_igreja_vocÃª_pertence?"],
    );
    pub const NAME: Aliases =
        Aliases::new(&["Nome completo", "nome_completo", "nome", "nome_obreiro"]);
    pub const EMAIL: Aliases = super::EMAIL;
    pub const PHONE: Aliases = Aliases::new(&["Telefone", "telefone"]);
    pub const PREACHING_DATE: Aliases = Aliases::with_legacy(
        &[
            "Data da pregação.",
            "data_da_pregação.",
            "Dia da pregação",
            "dia_da_pregação",
            "data_pregacao",
            "data_pregação",
        ],
        &["Data da pregaÃ§Ã£o.", "data_da_pregaÃ§Ã£o."],
    );
    pub const ORDINATION_DATE: Aliases = Aliases::with_legacy(
        &[
            "Data da Ordenação",
            "data_da_ordenação",
            "data_ordenacao",
            "Dia da Ordenação",
        ],
        &["Data da OrdenaÃ§Ã£o"],
    );
    pub const MINISTRY_ROLE: Aliases = Aliases::with_legacy(
        &["Função Ministerial ?", "função_ministerial_?", "funcao", "função"],
        &["FunÃ§Ã£o Ministerial ?", "funÃ§Ã£o_ministerial_?"],
    );
    pub const DESTINATION_IPDA: Aliases = Aliases::new(&["IPDA Destino", "ipda_destino"]);
    pub const DESTINATION_CHURCH: Aliases = Aliases::with_legacy(
        &[
            "Qual Igreja você está indo pregar?",
            "qual_igreja_você_está_indo_pregar?",
            "igreja_destino",
        ],
        &[
            "Qual Igreja vocÃª estÃ¡ indo pregar?",
            "qual_igreja_vocÃª_estÃ¡_indo_pregar?",
        ],
    );
    pub const STATUS: Aliases = Aliases::new(&[
        "status",
        "Status",
        "Status da carta",
        "Status Carta",
        "col_Z",
        "Coluna Z",
    ]);
    pub const MERGE_STATUS: Aliases = Aliases::new(&[
        "Document Merge Status - Cartas",
        "Document Merge Status - cartas",
        "document_merge_status_-_cartas",
        "Document Merge Status - Carta de Pregação",
        "status_merge",
        "status_carta",
    ]);
    pub const PDF_URL: Aliases = Aliases::new(&[
        "Merged Doc URL - Cartas",
        "Merged Doc URL - cartas",
        "merged_doc_url_-_cartas",
        "Link to merged Doc - Cartas",
        "Link to merged Doc - cartas",
        "link_to_merged_doc_-_cartas",
        "url_pdf",
        "Merged Doc URL - Carta de Pregação",
        "Link to merged Doc - Carta de Pregação",
    ]);
    pub const DOC_ID: Aliases = Aliases::new(&[
        "Merged Doc ID - Cartas",
        "Merged Doc ID - cartas",
        "merged_doc_id_-_cartas",
        "doc_id",
        "Merged Doc ID - Carta de Pregação",
    ]);
    pub const ROLE: Aliases = Aliases::with_legacy(
        &["cargo", "Função Ministerial ?", "col_Q"],
        &["FunÃ§Ã£o Ministerial ?"],
    );
    pub const MARKERS: RoleMarkers = super::MARKERS;
}

/// Workers sheet (`OBREIROS_DB` and friends).
pub mod worker {
    use super::{Aliases, RoleMarkers};

    pub const NAME: Aliases = Aliases::new(&["nome", "Nome", "Nome completo", "nome_completo"]);
    pub const ROLE: Aliases = Aliases::with_legacy(
        &["cargo", "Função Ministerial ?", "funcao", "função"],
        &["FunÃ§Ã£o Ministerial ?"],
    );
    pub const CHURCH: Aliases = Aliases::with_legacy(
        &[
            "igreja",
            "igreja_origem",
            "Qual Igreja Você Pertence?",
            "Qual Igreja você está indo pregar?",
        ],
        &["Qual Igreja VocÃª Pertence?"],
    );
    pub const FIELD: Aliases = Aliases::with_legacy(
        &["campo", "regiao", "região", "Qual região Pertence"],
        &["Qual regiÃ£o Pertence"],
    );
    pub const STATUS: Aliases = Aliases::new(&["status", "Status", "col_Z"]);
    pub const ORDINATION_DATE: Aliases = Aliases::with_legacy(
        &[
            "data_ordenacao",
            "data_ordenação",
            "Data da Ordenação",
            "Data da pregação.",
            "data_pregacao",
        ],
        &["data_ordenaÃ§Ã£o", "Data da OrdenaÃ§Ã£o"],
    );
    pub const BAPTISM_DATE: Aliases =
        Aliases::new(&["data_batismo", "Data do Batismo", "Data do batismo"]);
    pub const PHONE: Aliases = Aliases::new(&["telefone", "Telefone", "Celular", "WhatsApp"]);
    pub const EMAIL: Aliases = super::EMAIL;
    pub const MINISTRY_FUNCTION: Aliases = Aliases::with_legacy(
        &["Função Ministerial ?", "funcao", "função"],
        &["FunÃ§Ã£o Ministerial ?"],
    );
    pub const REGION: Aliases = Aliases::with_legacy(
        &["regiao", "região", "Qual região Pertence"],
        &["Qual regiÃ£o Pertence"],
    );
    pub const PHOTO_URL: Aliases = Aliases::new(&[
        "foto",
        "Foto",
        "imagem",
        "Imagem",
        "photo",
        "Photo",
        "url_foto",
        "URL Foto",
        "Link da foto",
        "Link Foto",
    ]);
    pub const MARKERS: RoleMarkers = super::MARKERS;
}

/// Access/status join sheet (`ACESSO`).
pub mod access {
    use super::Aliases;

    pub const EMAIL: Aliases = super::EMAIL;
    pub const NAME: Aliases = Aliases::new(&["nome", "Nome", "Nome completo"]);
    pub const PHONE: Aliases = Aliases::new(&["telefone", "Telefone", "WhatsApp", "Celular"]);
    pub const STATUS: Aliases =
        Aliases::new(&["status", "Status", "Statu", "Situação", "Situacao", "Acesso"]);
    pub const REASON: Aliases = Aliases::new(&[
        "motivo",
        "Motivo",
        "Motivo do bloqueio",
        "Justificativa",
        "Observação",
        "Observacao",
    ]);
}
