pub mod document_ops;
